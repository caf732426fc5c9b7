use aurorachrome_core::{Victory, VictoryAction};
use chrono::TimeDelta;
use yew::prelude::*;

use crate::utils::format_elapsed;

#[derive(Properties, PartialEq)]
pub(crate) struct VictoryProps {
    pub victory: Victory,
    #[prop_or_default]
    pub elapsed: Option<TimeDelta>,
    pub on_action: Callback<VictoryAction>,
}

/// Celebration overlay with the only two ways forward.
#[function_component]
pub(crate) fn VictoryOverlay(props: &VictoryProps) -> Html {
    let replay = {
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| on_action.emit(VictoryAction::Replay))
    };
    let menu = {
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| on_action.emit(VictoryAction::ReturnToMenu))
    };

    html! {
        <dialog class="victory" open={true}>
            <article>
                <h2>{"Congratulations!"}</h2>
                <p>{props.victory.message()}</p>
                {
                    for props.elapsed.map(|elapsed| html! {
                        <p class="elapsed">{format!("Time: {}", format_elapsed(elapsed))}</p>
                    })
                }
                <footer>
                    <button onclick={replay}>{"Play Again"}</button>
                    <button class="secondary" onclick={menu}>{"Choose New Game"}</button>
                </footer>
            </article>
        </dialog>
    }
}
