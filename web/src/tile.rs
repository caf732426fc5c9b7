use aurorachrome_core::*;
use web_sys::{Element, PointerEvent};
use yew::prelude::*;

use crate::drag::*;
use crate::utils::Handoff;
use crate::youtube::*;

const BOARD_SIDE: Px = TILE_GRID_SIZE as Px * TILE_CELL_SIZE;
const PLAYER_SIDE: u32 = BOARD_SIDE as u32;

pub(crate) enum Msg {
    PointerDown(usize, PointerEvent),
    PointerMove(ClientPoint),
    PointerUp(ClientPoint),
    BackgroundReady(BoardGeneration, YtPlayer),
    PieceReady {
        board: BoardGeneration,
        stage: BoardGeneration,
        piece: usize,
        player: YtPlayer,
    },
    Replay,
    Next,
}

#[derive(Properties, PartialEq)]
pub(crate) struct TileJigsawProps {
    pub game: Handoff<TileJigsaw>,
    pub stage: Stage,
    pub on_round: Callback<()>,
    pub on_victory: Callback<Victory>,
}

/// Live-video jigsaw: every piece plays its own crop of the clip.
pub(crate) struct TileJigsawView {
    game: Option<TileJigsaw>,
    board: NodeRef,
    background: NodeRef,
    windows: Vec<NodeRef>,
    drag: Option<DragListeners>,
    build_pending: bool,
}

impl TileJigsawView {
    fn build_players(&mut self, ctx: &Context<Self>) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let stage = ctx.props().stage.generation();
        let options = PlayerOptions::ambient_window(game.video()).with_size(PLAYER_SIDE, PLAYER_SIDE);

        if let Some(host) = self.background.cast::<Element>() {
            clear_host(&host);
            let link = ctx.link().clone();
            let spawned = spawn_player(
                &host,
                &options,
                move |player| link.send_message(Msg::BackgroundReady(stage, player)),
                |_| {},
            );
            if let Err(err) = spawned {
                log::warn!("no background video: {:?}", err);
            }
        }
        for window in &self.windows {
            if let Some(host) = window.cast::<Element>() {
                clear_host(&host);
            }
        }
        if let Some(piece) = game.request_adapter() {
            self.spawn_piece(ctx, piece);
        }
    }

    fn spawn_piece(&self, ctx: &Context<Self>, piece: usize) {
        let (Some(game), Some(host)) = (
            self.game.as_ref(),
            self.windows.get(piece).and_then(|window| window.cast::<Element>()),
        ) else {
            return;
        };
        let board = game.generation();
        let stage = ctx.props().stage.generation();
        let options = PlayerOptions::ambient_window(game.video()).with_size(PLAYER_SIDE, PLAYER_SIDE);
        let link = ctx.link().clone();
        let spawned = spawn_player(
            &host,
            &options,
            move |player| {
                link.send_message(Msg::PieceReady {
                    board,
                    stage,
                    piece,
                    player,
                })
            },
            |_| {},
        );
        if let Err(err) = spawned {
            log::warn!("no video for piece {}: {:?}", piece, err);
        }
    }

    fn crop(&self, piece: usize, player: &YtPlayer) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let (Some(iframe), Ok(offset)) = (player.iframe(), game.crop_offset(piece)) else {
            return;
        };
        let style = iframe.style();
        let applied = style
            .set_property("position", "absolute")
            .and_then(|_| style.set_property("left", &format!("{}px", offset.x)))
            .and_then(|_| style.set_property("top", &format!("{}px", offset.y)))
            .and_then(|_| style.set_property("pointer-events", "none"));
        if let Err(err) = applied {
            log::debug!("could not crop piece {}: {:?}", piece, err);
        }
    }

    fn pointer(&self, point: ClientPoint) -> Option<Point> {
        board_origin(&self.board).map(|origin| point.relative_to(origin))
    }

    fn rebuild(&mut self, ctx: &Context<Self>, advance: bool) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        self.drag = None;
        let generation = if advance { game.next() } else { game.replay() };
        log::debug!("tile jigsaw rebuilt as {:?}", generation);
        ctx.props().stage.rebuild();
        ctx.props().on_round.emit(());
        self.build_pending = true;
        true
    }
}

impl Component for TileJigsawView {
    type Message = Msg;
    type Properties = TileJigsawProps;

    fn create(ctx: &Context<Self>) -> Self {
        let game = ctx.props().game.take();
        if game.is_none() {
            log::error!("tile jigsaw view mounted without a game");
        }
        Self {
            game,
            board: NodeRef::default(),
            background: NodeRef::default(),
            windows: (0..TILE_PIECE_COUNT).map(|_| NodeRef::default()).collect(),
            drag: None,
            build_pending: true,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            PointerDown(piece, event) => {
                if !starts_drag(&event) {
                    return false;
                }
                let Some(point) = self.pointer(ClientPoint::of(&event)) else {
                    return false;
                };
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                match game.pointer_down(piece, point) {
                    Ok(()) => {
                        event.prevent_default();
                        self.drag = Some(DragListeners::attach(
                            ctx.link().callback(PointerMove),
                            ctx.link().callback(PointerUp),
                        ));
                        true
                    }
                    Err(err) => {
                        log::debug!("piece {} not draggable: {}", piece, err);
                        false
                    }
                }
            }
            PointerMove(point) => {
                let Some(point) = self.pointer(point) else {
                    return false;
                };
                self.game
                    .as_mut()
                    .is_some_and(|game| game.pointer_move(point).is_ok())
            }
            PointerUp(point) => {
                self.drag = None;
                let point = self.pointer(point);
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                if let Some(point) = point {
                    let _ = game.pointer_move(point);
                }
                match game.pointer_up() {
                    Ok(JigsawMove {
                        piece,
                        placement,
                        victory,
                    }) => {
                        if placement.is_locked() {
                            log::debug!("piece {} locked", piece);
                        }
                        if let Some(victory) = victory {
                            ctx.props().on_victory.emit(victory);
                        }
                        true
                    }
                    Err(err) => {
                        log::debug!("pointer up ignored: {}", err);
                        true
                    }
                }
            }
            BackgroundReady(stage, player) => {
                ctx.props()
                    .stage
                    .on_ready(stage, AdapterKey::Background, player);
                false
            }
            PieceReady {
                board,
                stage,
                piece,
                player,
            } => {
                if ctx
                    .props()
                    .stage
                    .on_ready(stage, AdapterKey::Piece(piece), player.clone())
                {
                    self.crop(piece, &player);
                }
                let next = self
                    .game
                    .as_mut()
                    .and_then(|game| game.on_adapter_ready(board, piece));
                if let Some(next) = next {
                    self.spawn_piece(ctx, next);
                }
                false
            }
            Replay => self.rebuild(ctx, false),
            Next => self.rebuild(ctx, true),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if std::mem::take(&mut self.build_pending) {
            self.build_players(ctx);
        }
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        self.drag = None;
        ctx.props().stage.stop_all();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(game) = self.game.as_ref() else {
            return html! { <p class="error">{"This puzzle could not be started."}</p> };
        };
        let board = game.board();
        let dragging = board.drag().is_dragging();
        let cb_replay = ctx.link().callback(|_: MouseEvent| Msg::Replay);
        let cb_next = ctx.link().callback(|_: MouseEvent| Msg::Next);

        html! {
            <div class="tile-jigsaw">
                <nav>
                    <aside class="counter">{board.tally().label()}</aside>
                    <span class="title">{&game.video().title}</span>
                    <aside>
                        <button onclick={cb_replay}>{"Replay"}</button>
                        <button onclick={cb_next}>{"Next Video"}</button>
                    </aside>
                </nav>
                <div
                    ref={self.board.clone()}
                    class={classes!("board", dragging.then_some("dragging"))}
                    style={format!("position:relative;width:{0}px;height:{0}px;touch-action:none", BOARD_SIDE)}
                >
                    <div ref={self.background.clone()} class="background hidden"/>
                    {
                        for board.iter().map(|(index, piece)| {
                            let position = piece.current();
                            let locked = piece.is_locked();
                            let onpointerdown = ctx
                                .link()
                                .callback(move |event: PointerEvent| Msg::PointerDown(index, event));
                            html! {
                                <div
                                    key={index}
                                    class={classes!("piece", locked.then_some("snapped"))}
                                    style={format!(
                                        "position:absolute;left:{}px;top:{}px;width:{2}px;height:{2}px;overflow:hidden",
                                        position.x, position.y, TILE_CELL_SIZE,
                                    )}
                                    {onpointerdown}
                                >
                                    <div ref={self.windows[index].clone()} class="window"/>
                                    if !locked {
                                        <div class="shade"/>
                                    }
                                    if dragging {
                                        <div class="blocker"/>
                                    }
                                </div>
                            }
                        })
                    }
                </div>
            </div>
        }
    }
}

