/// Popup UI: logins saved for the active tab's domain

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use log::warn;
use crate::browser::{BrowserTabs, connect};
use crate::error::LookupError;
use crate::flows::{ExtensionLookupFlow, LookupOutcome, LookupState};

#[derive(Clone, PartialEq)]
enum PopupState {
    Lookup(LookupState),
    Unconfigured(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Lookup(LookupState::Idle));

    // One lookup per popup open
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match connect().await {
                    Ok(client) => {
                        let flow = ExtensionLookupFlow::new(client, BrowserTabs);
                        let setter = state.clone();
                        flow.run(move |step| setter.set(PopupState::Lookup(step.clone()))).await;
                    }
                    Err(e) => {
                        warn!("Popup not configured: {}", e);
                        state.set(PopupState::Unconfigured(e));
                    }
                }
            });
            || ()
        });
    }

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"GPass"}</h1>

            {match &*state {
                PopupState::Unconfigured(msg) => html! {
                    <Alert r#type={AlertType::Warning} title={"Set up the store in the extension options"} inline={true}>
                        {msg.clone()}
                    </Alert>
                },
                PopupState::Lookup(LookupState::Rendered(outcome)) => render_outcome(outcome),
                PopupState::Lookup(LookupState::Failed(LookupError::NoActiveTab)) => html! {
                    <Alert r#type={AlertType::Danger} title={"No active tab"} inline={true}>
                    </Alert>
                },
                PopupState::Lookup(LookupState::Failed(LookupError::Client(_))) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {"Could not load logins from the store."}
                    </Alert>
                },
                PopupState::Lookup(_) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Looking up logins..."}</p>
                    </div>
                },
            }}
        </div>
    }
}

fn render_outcome(outcome: &LookupOutcome) -> Html {
    match outcome {
        LookupOutcome::NoMatch { key } if key.is_empty() => html! {
            <Alert r#type={AlertType::Info} title={"This page has no site to look up"} inline={true}>
            </Alert>
        },
        LookupOutcome::NoMatch { key } => html! {
            <Alert r#type={AlertType::Info} title={format!("No saved logins for {}", key)} inline={true}>
            </Alert>
        },
        LookupOutcome::Matches { key, records } => html! {
            <div class="flex-column-gap">
                <p class="message-text">{format!("Logins for {}", key)}</p>
                {for records.iter().map(|record| html! {
                    <div class="stat-item" key={record.id.to_string()}>
                        <span class="stat-domain">{&record.username}</span>
                        <code class="stat-count">{&record.password}</code>
                    </div>
                })}
            </div>
        },
    }
}
