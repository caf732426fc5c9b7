use aurorachrome_core::*;
use web_sys::{Element, PointerEvent};
use yew::prelude::*;

use crate::drag::*;
use crate::utils::Handoff;
use crate::youtube::*;

const PREVIEW_SIDE: u32 = SEQUENCE_PIECE_SIZE as u32;

pub(crate) enum Msg {
    PointerDown(usize, PointerEvent),
    PointerMove(ClientPoint),
    PointerUp(ClientPoint),
    BackgroundReady(BoardGeneration, YtPlayer),
    SegmentReady(BoardGeneration, usize, YtPlayer),
    SegmentState(BoardGeneration, usize, PlayerState),
    Replay,
    Shuffle,
    NewVideo,
}

#[derive(Properties, PartialEq)]
pub(crate) struct SequencePuzzleProps {
    pub game: Handoff<SequencePuzzle>,
    pub stage: Stage,
    pub on_round: Callback<()>,
    pub on_victory: Callback<Victory>,
}

/// Reassemble a clip from its eight looping segments.
pub(crate) struct SequencePuzzleView {
    game: Option<SequencePuzzle>,
    area: NodeRef,
    background: NodeRef,
    previews: Vec<NodeRef>,
    timers: SegmentTimers,
    drag: Option<DragListeners>,
    build_pending: bool,
}

/// Confinement timers of the mounted board, at most one per segment preview.
#[derive(Default)]
struct SegmentTimers(TaskSet<usize, IntervalTask>);

impl SegmentTimers {
    /// Starts ticking for `piece`, replacing any timer it already had.
    fn confine(&mut self, piece: usize, tick: impl FnMut() + 'static) {
        self.0
            .insert(piece, IntervalTask::every(CONFINEMENT_PERIOD_MS, tick));
    }

    fn clear(&mut self) {
        self.0.cancel_all();
    }

    fn live(&self) -> usize {
        self.0.len()
    }
}

/// Pixel extent of the play area holding both the pieces and the slots.
fn area_size(layout: SequenceLayout) -> Size {
    let last = SEGMENT_COUNT - 1;
    let pieces = layout_cell(layout.pieces_at, last);
    let slots = layout_cell(layout.slots_at, last);
    Size::new(
        pieces.x.max(slots.x) + SEQUENCE_PIECE_SIZE,
        pieces.y.max(slots.y) + SEQUENCE_PIECE_SIZE,
    )
}

impl SequencePuzzleView {
    fn segment(&self, piece: usize) -> Option<Segment> {
        let board = self.game.as_ref()?.board().ok()?;
        board.pieces().get(piece).map(|piece| *piece.segment())
    }

    fn build_players(&mut self, ctx: &Context<Self>) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let stage = ctx.props().stage.generation();

        if let Some(host) = self.background.cast::<Element>() {
            clear_host(&host);
            let link = ctx.link().clone();
            let spawned = spawn_player(
                &host,
                &game.background_options(),
                move |player| link.send_message(Msg::BackgroundReady(stage, player)),
                |_| {},
            );
            if let Err(err) = spawned {
                log::warn!("no background video: {:?}", err);
            }
        }

        let Ok(board) = game.board() else {
            return;
        };
        let options = game
            .segment_options()
            .with_size(PREVIEW_SIDE, PREVIEW_SIDE);
        for (piece, preview) in self.previews.iter().enumerate().take(board.pieces().len()) {
            let Some(host) = preview.cast::<Element>() else {
                continue;
            };
            clear_host(&host);
            let ready = ctx.link().clone();
            let state = ctx.link().clone();
            let spawned = spawn_player(
                &host,
                &options,
                move |player| ready.send_message(Msg::SegmentReady(stage, piece, player)),
                move |player_state| state.send_message(Msg::SegmentState(stage, piece, player_state)),
            );
            if let Err(err) = spawned {
                log::warn!("no preview for piece {}: {:?}", piece, err);
                break;
            }
        }
    }

    /// Restarts the periodic check that keeps `piece`'s preview inside its segment.
    fn confine_piece(&mut self, ctx: &Context<Self>, piece: usize) {
        let Some(segment) = self.segment(piece) else {
            return;
        };
        let stage = ctx.props().stage.clone();
        self.timers.confine(piece, move || {
            stage.with_ready(AdapterKey::Segment(piece), |player| {
                confine(player, &segment);
            });
        });
    }

    fn pointer(&self, point: ClientPoint) -> Option<Point> {
        board_origin(&self.area).map(|origin| point.relative_to(origin))
    }

    fn rebuild(&mut self, ctx: &Context<Self>, change: impl FnOnce(&mut SequencePuzzle) -> BoardGeneration) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        self.drag = None;
        self.timers.clear();
        let generation = change(game);
        log::debug!("sequence rebuilt as {:?}", generation);
        ctx.props().stage.rebuild();
        ctx.props().on_round.emit(());
        self.build_pending = true;
        true
    }

    fn board_view(&self, ctx: &Context<Self>, board: &SequenceBoard) -> Html {
        let size = area_size(board.layout());
        let dragging = board.drag().is_dragging();

        html! {
            <div
                ref={self.area.clone()}
                class={classes!("play-area", dragging.then_some("dragging"))}
                style={format!(
                    "position:relative;width:{}px;height:{}px;touch-action:none",
                    size.width, size.height,
                )}
            >
                {
                    for (0..SEGMENT_COUNT).map(|slot| {
                        let origin = board.slot_origin(slot);
                        html! {
                            <div
                                key={format!("slot-{}", slot)}
                                class={classes!("slot", board.slot_occupant(slot).map(|_| "filled"))}
                                style={format!(
                                    "position:absolute;left:{}px;top:{}px;width:{2}px;height:{2}px",
                                    origin.x, origin.y, SEQUENCE_PIECE_SIZE,
                                )}
                            >
                                {slot + 1}
                            </div>
                        }
                    })
                }
                {
                    for board.pieces().iter().enumerate().map(|(index, piece)| {
                        let position = piece.position();
                        let onpointerdown = ctx
                            .link()
                            .callback(move |event: PointerEvent| Msg::PointerDown(index, event));
                        html! {
                            <div
                                key={format!("piece-{}", index)}
                                class={classes!("piece", piece.is_correct().then_some("correct"))}
                                style={format!(
                                    "position:absolute;left:{}px;top:{}px;width:{2}px;height:{2}px;overflow:hidden",
                                    position.x, position.y, SEQUENCE_PIECE_SIZE,
                                )}
                                {onpointerdown}
                            >
                                <div ref={self.previews[index].clone()} class="preview"/>
                                <div class="blocker"/>
                            </div>
                        }
                    })
                }
            </div>
        }
    }
}

impl Component for SequencePuzzleView {
    type Message = Msg;
    type Properties = SequencePuzzleProps;

    fn create(ctx: &Context<Self>) -> Self {
        let game = ctx.props().game.take();
        if game.is_none() {
            log::error!("sequence view mounted without a game");
        }
        Self {
            game,
            area: NodeRef::default(),
            background: NodeRef::default(),
            previews: (0..SEGMENT_COUNT).map(|_| NodeRef::default()).collect(),
            timers: SegmentTimers::default(),
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
                    Ok(SequenceDrop { piece, slot, victory }) => {
                        log::debug!("piece {} dropped, slot {:?}", piece, slot);
                        if let Some(victory) = victory {
                            ctx.props().on_victory.emit(victory);
                        }
                    }
                    Err(err) => log::debug!("pointer up ignored: {}", err),
                }
                true
            }
            BackgroundReady(stage, player) => {
                ctx.props()
                    .stage
                    .on_ready(stage, AdapterKey::Background, player);
                false
            }
            SegmentReady(stage, piece, player) => {
                let key = AdapterKey::Segment(piece);
                if ctx.props().stage.on_ready(stage, key, player) {
                    if let Some(segment) = self.segment(piece) {
                        ctx.props().stage.with_ready(key, |player| {
                            player.seek_to(segment.start);
                            player.play();
                        });
                    }
                }
                false
            }
            SegmentState(stage, piece, state) => {
                if stage != ctx.props().stage.generation() {
                    return false;
                }
                match state {
                    PlayerState::Playing => self.confine_piece(ctx, piece),
                    PlayerState::Ended => {
                        if let Some(segment) = self.segment(piece) {
                            ctx.props()
                                .stage
                                .with_ready(AdapterKey::Segment(piece), |player| {
                                    player.seek_to(segment.start);
                                    player.play();
                                });
                        }
                    }
                    _ => {}
                }
                false
            }
            Replay => {
                if let Some(game) = self.game.as_ref() {
                    let position = game.replay_position();
                    ctx.props()
                        .stage
                        .with_ready(AdapterKey::Background, |player| {
                            player.seek_to(position);
                            player.play();
                        });
                }
                false
            }
            Shuffle => self.rebuild(ctx, SequencePuzzle::rebuild),
            NewVideo => self.rebuild(ctx, SequencePuzzle::new_video),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if std::mem::take(&mut self.build_pending) {
            self.build_players(ctx);
        }
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        self.drag = None;
        self.timers.clear();
        log::trace!("sequence unmounted, {} timers left", self.timers.live());
        ctx.props().stage.stop_all();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(game) = self.game.as_ref() else {
            return html! { <p class="error">{"This puzzle could not be started."}</p> };
        };
        let cb_replay = ctx.link().callback(|_: MouseEvent| Msg::Replay);
        let cb_shuffle = ctx.link().callback(|_: MouseEvent| Msg::Shuffle);
        let cb_new_video = ctx.link().callback(|_: MouseEvent| Msg::NewVideo);
        let counter = game
            .board()
            .map(|board| board.tally().label())
            .unwrap_or_default();

        html! {
            <div class="sequence-puzzle">
                <nav>
                    <aside class="counter">{counter}</aside>
                    <span class="title">{&game.video().title}</span>
                    <aside>
                        <button onclick={cb_replay}>{"Replay"}</button>
                        <button onclick={cb_shuffle}>{"Shuffle"}</button>
                        <button onclick={cb_new_video}>{"New Video"}</button>
                    </aside>
                </nav>
                <div ref={self.background.clone()} class="background"/>
                {
                    match game.board() {
                        Ok(board) => self.board_view(ctx, board),
                        Err(err) => html! {
                            <p class="error">{format!("This clip cannot be split into a sequence: {}", err)}</p>
                        },
                    }
                }
            </div>
        }
    }
}
