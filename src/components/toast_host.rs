use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use mavigo_core::toast::{Toast, ToastContainer, ToastId};

use crate::context::{use_app, ToastCommand};

/// Both toast stacks. Hovering a toast keeps it until dismissed.
#[component]
pub fn ToastHost() -> impl IntoView {
    view! {
        <div class="toast-stack toast-stack-important">
            <ToastList container=ToastContainer::Important />
        </div>
        <div class="toast-stack">
            <ToastList container=ToastContainer::Normal />
        </div>
    }
}

#[component]
fn ToastList(container: ToastContainer) -> impl IntoView {
    let toasts = use_app().toasts;
    let navigate = use_navigate();

    let run = move |id: ToastId| {
        let Some(command) = toasts.try_update(|t| t.take_action(id)).flatten() else {
            return;
        };
        match command {
            ToastCommand::OpenView(view) => navigate(view.path(), Default::default()),
        }
    };

    let items = move || {
        toasts.with(|t| {
            t.in_container(container)
                .into_iter()
                .cloned()
                .collect::<Vec<Toast<ToastCommand>>>()
        })
    };

    let toast_key = |toast: &Toast<ToastCommand>| toast.id;

    view! {
        <For each=items key=toast_key let:toast>
            {
                let id = toast.id;
                let run = run.clone();
                let action = toast.action.clone().map(|action| {
                    view! {
                        <button class="toast-action" on:click=move |_| run(id)>
                            {action.label}
                        </button>
                    }
                });
                view! {
                    <div
                        class=format!("toast toast-{}", toast.kind.as_str())
                        role="status"
                        on:mouseenter=move |_| toasts.update(|t| t.pin(id))
                    >
                        <span class="toast-message">{toast.message.clone()}</span>
                        {action}
                        <button
                            class="toast-close"
                            title="Dismiss"
                            on:click=move |_| {
                                toasts.update(|t| {
                                    t.dismiss(id);
                                });
                            }
                        >
                            "\u{2715}"
                        </button>
                    </div>
                }
            }
        </For>
    }
}
