use aurorachrome_core::*;
use gloo::timers::callback::Timeout;
use web_sys::Element;
use yew::prelude::*;

use crate::utils::Handoff;
use crate::youtube::*;

const CARD_WIDTH: u32 = 240;
const CARD_HEIGHT: u32 = 135;
const NOTICE_MILLIS: u32 = 1500;

pub(crate) enum Msg {
    SelectThumbnail(MatchId),
    SelectVideo(MatchId),
    CardReady(BoardGeneration, MatchId, YtPlayer),
    ClearNotice,
}

#[derive(Properties, PartialEq)]
pub(crate) struct MemoryMatchProps {
    pub game: Handoff<MemoryMatch>,
    pub stage: Stage,
    pub on_victory: Callback<Victory>,
}

/// Pair each thumbnail with the live video it was taken from.
pub(crate) struct MemoryMatchView {
    game: Option<MemoryMatch>,
    cards: Vec<NodeRef>,
    notice: Option<Timeout>,
    build_pending: bool,
}

impl MemoryMatchView {
    fn build_players(&self, ctx: &Context<Self>) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let stage = ctx.props().stage.generation();
        for card in game.cards() {
            let Some(host) = self.cards.get(card.match_id).and_then(|card| card.cast::<Element>()) else {
                continue;
            };
            clear_host(&host);
            let options = PlayerOptions::ambient_window(&card.video).with_size(CARD_WIDTH, CARD_HEIGHT);
            let match_id = card.match_id;
            let link = ctx.link().clone();
            let spawned = spawn_player(
                &host,
                &options,
                move |player| link.send_message(Msg::CardReady(stage, match_id, player)),
                |_| {},
            );
            if let Err(err) = spawned {
                log::warn!("no video for card {}: {:?}", match_id, err);
                break;
            }
        }
    }

    fn show_mismatch(&mut self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        // Replacing the timeout drops the previous one, which cancels it.
        self.notice = Some(Timeout::new(NOTICE_MILLIS, move || {
            link.send_message(Msg::ClearNotice)
        }));
    }
}

impl Component for MemoryMatchView {
    type Message = Msg;
    type Properties = MemoryMatchProps;

    fn create(ctx: &Context<Self>) -> Self {
        let game = ctx.props().game.take();
        if game.is_none() {
            log::error!("memory match view mounted without a game");
        }
        Self {
            game,
            cards: (0..MEMORY_PAIRS).map(|_| NodeRef::default()).collect(),
            notice: None,
            build_pending: true,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let Some(game) = self.game.as_mut() else {
            return false;
        };
        match msg {
            SelectThumbnail(match_id) => match game.select_thumbnail(match_id) {
                Ok(()) => true,
                Err(err) => {
                    log::debug!("thumbnail {} not selectable: {}", match_id, err);
                    false
                }
            },
            SelectVideo(match_id) => match game.select_video(match_id) {
                Ok(MatchOutcome::Ignored) => false,
                Ok(MatchOutcome::Mismatch) => {
                    self.show_mismatch(ctx);
                    true
                }
                Ok(MatchOutcome::Matched { victory }) => {
                    ctx.props().stage.release(AdapterKey::Card(match_id));
                    if let Some(victory) = victory {
                        ctx.props().on_victory.emit(victory);
                    }
                    true
                }
                Err(err) => {
                    log::debug!("video {} not selectable: {}", match_id, err);
                    false
                }
            },
            CardReady(stage, match_id, player) => {
                ctx.props()
                    .stage
                    .on_ready(stage, AdapterKey::Card(match_id), player);
                false
            }
            ClearNotice => self.notice.take().is_some(),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if std::mem::take(&mut self.build_pending) {
            self.build_players(ctx);
        }
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        self.notice = None;
        ctx.props().stage.stop_all();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(game) = self.game.as_ref() else {
            return html! { <p class="error">{"This game could not be started."}</p> };
        };
        let selected = match game.selection() {
            Selection::ThumbnailSelected(match_id) => Some(match_id),
            Selection::NoneSelected => None,
        };

        html! {
            <div class="memory-match">
                <nav>
                    <aside class="counter">{game.tally().label()}</aside>
                    <span>{format!("Matches: {} / {}", game.score(), MEMORY_PAIRS)}</span>
                </nav>
                if self.notice.is_some() {
                    <p class="notice">{"Not a match, try again!"}</p>
                }
                <section class="thumbnails">
                    {
                        for game.thumbnails().map(|card| {
                            let match_id = card.match_id;
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::SelectThumbnail(match_id));
                            html! {
                                <img
                                    key={match_id}
                                    class={classes!("thumbnail", (selected == Some(match_id)).then_some("selected"))}
                                    src={card.video.thumbnail_url(ThumbnailQuality::Medium)}
                                    alt={card.video.title.clone()}
                                    {onclick}
                                />
                            }
                        })
                    }
                </section>
                <section class="videos">
                    {
                        // Cleared cards stay mounted but hidden so the other iframes never reload.
                        for game.cards().iter().map(|card| {
                            let match_id = card.match_id;
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::SelectVideo(match_id));
                            html! {
                                <div key={match_id} class="video-card" hidden={card.is_cleared()} {onclick}>
                                    <div ref={self.cards[match_id].clone()} class="player"/>
                                    <div class="blocker"/>
                                </div>
                            }
                        })
                    }
                </section>
            </div>
        }
    }
}
