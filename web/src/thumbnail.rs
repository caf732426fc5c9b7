use aurorachrome_core::*;
use web_sys::{HtmlSelectElement, PointerEvent};
use yew::prelude::*;

use crate::drag::*;
use crate::settings::Settings;
use crate::utils::{Handoff, LocalOrDefault};

pub(crate) enum Msg {
    PointerDown(usize, PointerEvent),
    PointerMove(ClientPoint),
    PointerUp(ClientPoint),
    Rotate(usize),
    Regenerate,
    SetPreset(GridPreset),
    Next,
}

#[derive(Properties, PartialEq)]
pub(crate) struct ThumbnailJigsawProps {
    pub game: Handoff<ThumbnailJigsaw>,
    pub on_round: Callback<()>,
    pub on_victory: Callback<Victory>,
}

pub(crate) struct ThumbnailJigsawView {
    game: Option<ThumbnailJigsaw>,
    board: NodeRef,
    drag: Option<DragListeners>,
}

impl ThumbnailJigsawView {
    fn pointer(&self, point: ClientPoint) -> Option<Point> {
        board_origin(&self.board).map(|origin| point.relative_to(origin))
    }

    fn settle(ctx: &Context<Self>, outcome: Result<JigsawMove>) {
        match outcome {
            Ok(JigsawMove {
                victory: Some(victory),
                ..
            }) => ctx.props().on_victory.emit(victory),
            Ok(_) => {}
            Err(err) => log::debug!("move ignored: {}", err),
        }
    }

    fn new_round(&mut self, ctx: &Context<Self>, change: impl FnOnce(&mut ThumbnailJigsaw)) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        self.drag = None;
        change(game);
        ctx.props().on_round.emit(());
        true
    }

    fn piece_view(&self, ctx: &Context<Self>, game: &ThumbnailJigsaw, index: usize, piece: &Piece) -> Html {
        let size = game.piece_size();
        let image_size = game.image_size();
        let offset = game.background_offset(index).unwrap_or(Point::ORIGIN);
        let position = piece.current();
        let style = format!(
            "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;\
             background-image:url('{}');background-size:{}px {}px;background-position:{}px {}px;\
             transform:rotate({}deg)",
            position.x,
            position.y,
            size.width,
            size.height,
            game.thumbnail_url(),
            image_size.width,
            image_size.height,
            offset.x,
            offset.y,
            piece.rotation().degrees(),
        );
        let onpointerdown = ctx
            .link()
            .callback(move |event: PointerEvent| Msg::PointerDown(index, event));
        let ondblclick = ctx.link().callback(move |_: MouseEvent| Msg::Rotate(index));

        html! {
            <div
                key={index}
                class={classes!("piece", piece.is_locked().then_some("snapped"))}
                {style}
                {onpointerdown}
                {ondblclick}
            />
        }
    }
}

impl Component for ThumbnailJigsawView {
    type Message = Msg;
    type Properties = ThumbnailJigsawProps;

    fn create(ctx: &Context<Self>) -> Self {
        let game = ctx.props().game.take();
        if game.is_none() {
            log::error!("thumbnail jigsaw view mounted without a game");
        }
        Self {
            game,
            board: NodeRef::default(),
            drag: None,
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
                Self::settle(ctx, game.pointer_up());
                true
            }
            Rotate(piece) => {
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                Self::settle(ctx, game.rotate(piece));
                true
            }
            Regenerate => self.new_round(ctx, ThumbnailJigsaw::regenerate),
            SetPreset(preset) => {
                let settings = Settings { grid: preset };
                settings.local_save();
                self.new_round(ctx, |game| game.set_preset(preset))
            }
            Next => self.new_round(ctx, ThumbnailJigsaw::next),
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.drag = None;
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(game) = self.game.as_ref() else {
            return html! { <p class="error">{"This puzzle could not be started."}</p> };
        };
        let board = game.board();
        let board_size = game.board_size();
        let current = game.preset();

        let cb_regenerate = ctx.link().callback(|_: MouseEvent| Msg::Regenerate);
        let cb_next = ctx.link().callback(|_: MouseEvent| Msg::Next);
        let cb_preset = ctx.link().batch_callback(|event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            let count = select.value().parse::<usize>().ok()?;
            GridPreset::from_piece_count(count).map(Msg::SetPreset)
        });

        html! {
            <div class="thumbnail-jigsaw">
                <nav>
                    <aside class="counter">{board.tally().label()}</aside>
                    <span class="title">{&game.video().title}</span>
                    <aside>
                        <select onchange={cb_preset}>
                            {
                                for GridPreset::ALL.into_iter().map(|preset| html! {
                                    <option
                                        value={preset.piece_count().to_string()}
                                        selected={preset == current}
                                    >
                                        {preset.label()}
                                    </option>
                                })
                            }
                        </select>
                        <button onclick={cb_regenerate}>{"New Puzzle"}</button>
                        <button onclick={cb_next}>{"Next Thumbnail"}</button>
                    </aside>
                </nav>
                <div
                    ref={self.board.clone()}
                    class={classes!("board", board.drag().is_dragging().then_some("dragging"))}
                    style={format!(
                        "position:relative;width:{}px;height:{}px;touch-action:none",
                        board_size.width, board_size.height,
                    )}
                >
                    { for board.iter().map(|(index, piece)| self.piece_view(ctx, game, index, piece)) }
                </div>
                <p class="hint">{"Drag pieces into place. Double-click a piece to rotate it."}</p>
            </div>
        }
    }
}
