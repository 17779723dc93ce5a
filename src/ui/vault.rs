/// Web table: every stored login, with live search, URL sort and a new-record form

use std::collections::HashSet;
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use log::warn;
use crate::browser::{connect, copy_to_clipboard};
use crate::cache::CredentialCache;
use crate::credential::{CollectionSnapshot, CredentialId, NewCredential};
use crate::flows::{WebSyncFlow, WebSyncSession};
use crate::operations::{SortDirection, TableView, display_password, highlight_segments};

#[derive(Clone, PartialEq)]
enum FormState {
    Closed,
    Open(Option<String>), // last submit error
    Submitting,
}

#[function_component(Vault)]
pub fn vault() -> Html {
    let session = use_mut_ref(|| None::<WebSyncSession>);
    let snapshot = use_state(CollectionSnapshot::default);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let view = use_state(TableView::default);
    let revealed = use_state(HashSet::<CredentialId>::new);
    let form = use_state(NewCredential::default);
    let form_state = use_state(|| FormState::Closed);

    // Mount on first render, unsubscribe on unmount
    {
        let session = session.clone();
        let snapshot = snapshot.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_effect_with((), move |_| {
            let slot = session.clone();
            spawn_local(async move {
                let client = match connect().await {
                    Ok(client) => client,
                    Err(e) => {
                        error.set(Some(e));
                        return;
                    }
                };

                let flow = WebSyncFlow::new(CredentialCache::new(client));
                let mounted = flow.mount(move |next| snapshot.set(next.clone()));
                let initial = mounted.refresh();
                *slot.borrow_mut() = Some(mounted);

                loading.set(true);
                if let Err(e) = initial.await {
                    error.set(Some(e.to_string()));
                }
                loading.set(false);
            });

            move || {
                session.borrow_mut().take();
            }
        });
    }

    let on_refresh = {
        let session = session.clone();
        let loading = loading.clone();
        let error = error.clone();

        Callback::from(move |_: MouseEvent| {
            let Some(refresh) = session.borrow().as_ref().map(WebSyncSession::refresh) else {
                return;
            };
            let loading = loading.clone();
            let error = error.clone();

            loading.set(true);
            spawn_local(async move {
                match refresh.await {
                    Ok(_) => error.set(None),
                    Err(e) => error.set(Some(e.to_string())),
                }
                loading.set(false);
            });
        })
    };

    let on_search_input = {
        let view = view.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*view).clone();
                next.query = input.value();
                view.set(next);
            }
        })
    };

    let on_sort = {
        let view = view.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*view).clone();
            next.cycle_sort();
            view.set(next);
        })
    };

    let on_toggle_reveal = {
        let revealed = revealed.clone();
        Callback::from(move |id: CredentialId| {
            let mut next = (*revealed).clone();
            if !next.remove(&id) {
                next.insert(id);
            }
            revealed.set(next);
        })
    };

    let on_open_form = {
        let form_state = form_state.clone();
        Callback::from(move |_: MouseEvent| form_state.set(FormState::Open(None)))
    };

    let on_close_form = {
        let form_state = form_state.clone();
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            form.set(NewCredential::default());
            form_state.set(FormState::Closed);
        })
    };

    let on_submit = {
        let session = session.clone();
        let form = form.clone();
        let form_state = form_state.clone();

        Callback::from(move |_: MouseEvent| {
            let record = (*form).clone();
            let Some(create) = session.borrow().as_ref().map(|s| s.create(record)) else {
                return;
            };
            let form = form.clone();
            let form_state = form_state.clone();

            form_state.set(FormState::Submitting);
            spawn_local(async move {
                match create.await {
                    Ok(_) => {
                        form.set(NewCredential::default());
                        form_state.set(FormState::Closed);
                    }
                    Err(e) => {
                        warn!("Create failed: {}", e);
                        form_state.set(FormState::Open(Some(e.to_string())));
                    }
                }
            });
        })
    };

    let field_input = |apply: fn(&mut NewCredential, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                apply(&mut next, input.value());
                form.set(next);
            }
        })
    };

    let rows = view.project(&snapshot);
    let sort_label = match view.sort {
        None => "URL",
        Some(SortDirection::Ascending) => "URL ▲",
        Some(SortDirection::Descending) => "URL ▼",
    };

    html! {
        <div class="app">
            <header class="header">
                <h1 class="popup-title">{"GPass"}</h1>
                <Button onclick={on_refresh} disabled={*loading} variant={ButtonVariant::Secondary}>
                    {"Refresh"}
                </Button>
                <Button onclick={on_open_form} variant={ButtonVariant::Primary}>
                    {"New Pass"}
                </Button>
            </header>

            if let Some(err) = (*error).clone() {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err}
                </Alert>
            }

            if *loading {
                <div class="loading-text-center">
                    <Spinner />
                </div>
            }

            <input
                class="pf-v5-c-form-control search-input"
                type="search"
                placeholder="Search"
                value={view.query.clone()}
                oninput={on_search_input}
            />

            <table class="pf-v5-c-table pf-m-compact">
                <thead>
                    <tr>
                        <th><button class="pf-v5-c-table__button" onclick={on_sort}>{sort_label}</button></th>
                        <th>{"Username"}</th>
                        <th>{"Password"}</th>
                    </tr>
                </thead>
                <tbody>
                    {for rows.iter().map(|row| {
                        let is_revealed = revealed.contains(&row.id);
                        let on_reveal = {
                            let toggle = on_toggle_reveal.clone();
                            let id = row.id.clone();
                            Callback::from(move |_: MouseEvent| toggle.emit(id.clone()))
                        };
                        let on_copy = {
                            let password = row.password.clone();
                            Callback::from(move |_: MouseEvent| {
                                let password = password.clone();
                                spawn_local(async move {
                                    if let Err(e) = copy_to_clipboard(&password).await {
                                        warn!("{}", e);
                                    }
                                });
                            })
                        };
                        html! {
                            <tr key={row.id.to_string()}>
                                <td class="url-cell">
                                    {for highlight_segments(&row.url, &view.query).into_iter().map(|(run, hit)| {
                                        if hit { html! { <mark>{run}</mark> } } else { html! { {run} } }
                                    })}
                                </td>
                                <td>{&row.username}</td>
                                <td>
                                    <code>{display_password(row, is_revealed)}</code>
                                    <button class="pf-v5-c-button pf-m-link" onclick={on_reveal}>
                                        {if is_revealed { "Hide" } else { "Show" }}
                                    </button>
                                    <button class="pf-v5-c-button pf-m-link" onclick={on_copy}>
                                        {"Copy"}
                                    </button>
                                </td>
                            </tr>
                        }
                    })}
                </tbody>
            </table>

            {match &*form_state {
                FormState::Closed => html! {},
                FormState::Open(_) | FormState::Submitting => {
                    let submitting = *form_state == FormState::Submitting;
                    html! {
                        <div class="modal">
                            <h2 class="stats-title">{"New Pass"}</h2>
                            if let FormState::Open(Some(err)) = &*form_state {
                                <Alert r#type={AlertType::Danger} title={"Could not save"} inline={true}>
                                    {err.clone()}
                                </Alert>
                            }
                            <input
                                class="pf-v5-c-form-control"
                                placeholder="https://example.com"
                                value={form.url.clone()}
                                oninput={field_input(|f, v| f.url = v)}
                            />
                            <input
                                class="pf-v5-c-form-control"
                                placeholder="Username or email"
                                value={form.username.clone()}
                                oninput={field_input(|f, v| f.username = v)}
                            />
                            <input
                                class="pf-v5-c-form-control"
                                type="password"
                                placeholder="Leave empty to generate"
                                value={form.password.clone()}
                                oninput={field_input(|f, v| f.password = v)}
                            />
                            <Button onclick={on_submit} disabled={submitting} variant={ButtonVariant::Primary}>
                                {"Save"}
                            </Button>
                            <Button onclick={on_close_form} disabled={submitting} variant={ButtonVariant::Secondary}>
                                {"Cancel"}
                            </Button>
                        </div>
                    }
                }
            }}
        </div>
    }
}
