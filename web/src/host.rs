use aurorachrome_core::*;
use chrono::{DateTime, TimeDelta, Utc};
use clap::Args;
use gloo::net::http::Request;
use yew::prelude::*;

use crate::memory::MemoryMatchView;
use crate::sequence::SequencePuzzleView;
use crate::settings::Settings;
use crate::thumbnail::ThumbnailJigsawView;
use crate::tile::TileJigsawView;
use crate::utils::*;
use crate::victory::VictoryOverlay;
use crate::youtube::Stage;

#[derive(Args, Properties, Clone, Debug, PartialEq)]
pub(crate) struct HostProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Where to fetch the content catalog from
    #[arg(long, default_value = "shows.json")]
    pub catalog: String,
}

async fn fetch_catalog(url: &str) -> anyhow::Result<Catalog> {
    let response = Request::get(url).send().await?;
    if !response.ok() {
        anyhow::bail!("catalog request returned {} {}", response.status(), response.status_text());
    }
    let text = response.text().await?;
    Ok(Catalog::from_json(&text)?)
}

enum CatalogState {
    Loading,
    Ready(Catalog),
    Failed(String),
}

/// A started cartridge waiting to be picked up by its view.
enum MountedView {
    TileJigsaw(Handoff<TileJigsaw>),
    ThumbnailJigsaw(Handoff<ThumbnailJigsaw>),
    SequencePuzzle(Handoff<SequencePuzzle>),
    MemoryMatch(Handoff<MemoryMatch>),
}

impl From<MountedCartridge> for MountedView {
    fn from(mounted: MountedCartridge) -> Self {
        match mounted {
            MountedCartridge::TileJigsaw(game) => Self::TileJigsaw(Handoff::new(game)),
            MountedCartridge::ThumbnailJigsaw(game) => Self::ThumbnailJigsaw(Handoff::new(game)),
            MountedCartridge::SequencePuzzle(game) => Self::SequencePuzzle(Handoff::new(game)),
            MountedCartridge::MemoryMatch(game) => Self::MemoryMatch(Handoff::new(game)),
        }
    }
}

/// The entry currently in the play area, with its load result.
struct Session {
    entry: EntryRef,
    mount: u32,
    view: std::result::Result<MountedView, GameError>,
    started_at: DateTime<Utc>,
    victory: Option<(Victory, Option<TimeDelta>)>,
}

pub(crate) enum Msg {
    CatalogLoaded(std::result::Result<Catalog, String>),
    Open(EntryRef),
    RoundStarted,
    Won(Victory),
    Action(VictoryAction),
}

pub(crate) struct HostView {
    catalog: CatalogState,
    registry: CartridgeRegistry,
    stage: Stage,
    session: Option<Session>,
    mounts: u32,
}

impl HostView {
    fn next_seed(&self, ctx: &Context<Self>) -> u64 {
        ctx.props()
            .seed
            .map_or_else(js_random_seed, |seed| seed.wrapping_add(u64::from(self.mounts)))
    }

    /// Silences whatever is playing and forgets the mounted cartridge's adapters.
    fn stop_everything(&self) {
        self.stage.stop_all();
        self.stage.rebuild();
    }

    fn open(&mut self, ctx: &Context<Self>, entry: EntryRef) -> bool {
        let CatalogState::Ready(catalog) = &self.catalog else {
            return false;
        };
        let Some(game) = catalog.entry(&entry) else {
            log::warn!("no catalog entry {:?}", entry);
            return false;
        };
        self.stop_everything();

        let settings = Settings::local_or_default();
        let options = StartOptions {
            grid: settings.grid,
            ..StartOptions::default()
        };
        let rng = GameRng::from_seed(self.next_seed(ctx));
        let script = game.cartridge_name().unwrap_or_default();
        let view = self
            .registry
            .load(script, game.playlist.clone(), rng, &options)
            .map(MountedView::from);
        match &view {
            Ok(_) => log::info!("loaded {:?} as {}", entry, script),
            Err(err) => log::error!("could not load {:?}: {}", entry, err),
        }

        self.mounts = self.mounts.wrapping_add(1);
        self.session = Some(Session {
            entry,
            mount: self.mounts,
            view,
            started_at: utc_now(),
            victory: None,
        });
        true
    }

    fn menu_view(&self, ctx: &Context<Self>) -> Html {
        let catalog = match &self.catalog {
            CatalogState::Loading => return html! { <p aria-busy="true">{"Loading games…"}</p> },
            CatalogState::Failed(err) => {
                return html! { <p class="error">{format!("Could not load the catalog: {}", err)}</p> };
            }
            CatalogState::Ready(catalog) => catalog,
        };
        let current = self.session.as_ref().map(|session| &session.entry);

        html! {
            <ul class="menu">
                {
                    for catalog.games().into_iter().map(|(entry, game)| {
                        let active = current == Some(&entry);
                        let onclick = {
                            let entry = entry.clone();
                            ctx.link().callback(move |_: MouseEvent| Msg::Open(entry.clone()))
                        };
                        html! {
                            <li key={format!("{}/{}", entry.content_type, entry.key)}>
                                <button
                                    class={classes!(active.then_some("active"))}
                                    title={game.description.clone()}
                                    {onclick}
                                >
                                    {&game.title}
                                </button>
                            </li>
                        }
                    })
                }
            </ul>
        }
    }

    fn play_view(&self, ctx: &Context<Self>, session: &Session) -> Html {
        let instructions = match &self.catalog {
            CatalogState::Ready(catalog) => catalog
                .entry(&session.entry)
                .and_then(|entry| entry.game_play.clone()),
            _ => None,
        };
        let stage = self.stage.clone();
        let on_round = ctx.link().callback(|_| Msg::RoundStarted);
        let on_victory = ctx.link().callback(Msg::Won);

        let cartridge = match &session.view {
            Err(err) => html! {
                <article class="error">
                    <h3>{"This game could not be started"}</h3>
                    <p>{err.to_string()}</p>
                </article>
            },
            Ok(MountedView::TileJigsaw(game)) => html! {
                <TileJigsawView key={session.mount} game={game.clone()} {stage} {on_round} {on_victory}/>
            },
            Ok(MountedView::ThumbnailJigsaw(game)) => html! {
                <ThumbnailJigsawView key={session.mount} game={game.clone()} {on_round} {on_victory}/>
            },
            Ok(MountedView::SequencePuzzle(game)) => html! {
                <SequencePuzzleView key={session.mount} game={game.clone()} {stage} {on_round} {on_victory}/>
            },
            Ok(MountedView::MemoryMatch(game)) => html! {
                <MemoryMatchView key={session.mount} game={game.clone()} {stage} {on_victory}/>
            },
        };

        html! {
            <>
                { for instructions.map(|text| html! { <p class="game-play">{text}</p> }) }
                {cartridge}
            </>
        }
    }
}

impl Component for HostView {
    type Message = Msg;
    type Properties = HostProps;

    fn create(ctx: &Context<Self>) -> Self {
        let url = ctx.props().catalog.clone();
        ctx.link().send_future(async move {
            Msg::CatalogLoaded(fetch_catalog(&url).await.map_err(|err| format!("{:#}", err)))
        });
        let registry = CartridgeRegistry::with_builtin();
        log::debug!("cartridges: {:?}", registry.names().collect::<Vec<_>>());
        Self {
            catalog: CatalogState::Loading,
            registry,
            stage: Stage::default(),
            session: None,
            mounts: 0,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CatalogLoaded(Ok(catalog)) => {
                log::info!("catalog has {} games", catalog.games().len());
                self.catalog = CatalogState::Ready(catalog);
                true
            }
            CatalogLoaded(Err(err)) => {
                log::error!("catalog failed to load: {}", err);
                self.catalog = CatalogState::Failed(err);
                true
            }
            Open(entry) => self.open(ctx, entry),
            RoundStarted => {
                if let Some(session) = self.session.as_mut() {
                    session.started_at = utc_now();
                    session.victory = None;
                }
                true
            }
            Won(victory) => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                let elapsed = utc_now().signed_duration_since(session.started_at);
                log::info!("{} ({}s)", victory.message(), elapsed.num_seconds());
                session.victory = Some((victory, Some(elapsed)));
                true
            }
            Action(VictoryAction::Replay) => match self.session.as_ref() {
                Some(session) => {
                    let entry = session.entry.clone();
                    self.open(ctx, entry)
                }
                None => false,
            },
            Action(VictoryAction::ReturnToMenu) => {
                self.stop_everything();
                self.session.take().is_some()
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let victory = self
            .session
            .as_ref()
            .and_then(|session| session.victory)
            .map(|(victory, elapsed)| {
                let on_action = ctx.link().callback(Msg::Action);
                html! {
                    <Modal><VictoryOverlay {victory} {elapsed} {on_action}/></Modal>
                }
            });

        html! {
            <div class="cellar">
                <aside>{self.menu_view(ctx)}</aside>
                <main>
                    {
                        match &self.session {
                            Some(session) => self.play_view(ctx, session),
                            None => html! { <p class="placeholder">{"Choose a game to play."}</p> },
                        }
                    }
                </main>
                {for victory}
            </div>
        }
    }
}
