use leptos::prelude::*;
use mavigo_core::error::LINK_GOOGLE_TASKS_MESSAGE;
use mavigo_core::models::Task;
use mavigo_core::tasks::{task_gate, TaskForm, TaskGate};
use mavigo_core::toast::ToastSpec;
use mavigo_core::{Action, ErrorContext, View};
use wasm_bindgen_futures::spawn_local;

use crate::components::link_badge::LinkBadge;
use crate::context::{use_app, AppContext};

fn refresh(ctx: AppContext, force: bool) {
    spawn_local(async move {
        if let Err(err) = ctx.client.reload_tasks(&ctx.state, force).await {
            ctx.error(&err, ErrorContext::Tasks);
        }
    });
}

#[component]
fn TaskRow(task: Task) -> impl IntoView {
    let ctx = use_app();
    let done = task.is_completed();
    let complete_id = task.id.clone();
    let delete_id = task.id.clone();
    let complete_ctx = ctx.clone();
    let delete_ctx = ctx.clone();
    // RFC 3339 from Google; only the date matters
    let due = task.due.as_deref().map(|d| d.chars().take(10).collect::<String>());

    let complete = move |_| {
        let ctx = complete_ctx.clone();
        let id = complete_id.clone();
        spawn_local(async move {
            match ctx.client.complete_task(&ctx.state, &id).await {
                Ok(()) => ctx.toast(ToastSpec::success("Task done")),
                Err(err) => ctx.error(&err, ErrorContext::Tasks),
            }
        });
    };

    let delete = move |_| {
        let ctx = delete_ctx.clone();
        let id = delete_id.clone();
        spawn_local(async move {
            if let Err(err) = ctx.client.delete_task(&ctx.state, &id).await {
                ctx.error(&err, ErrorContext::Tasks);
            }
        });
    };

    view! {
        <li class=if done { "task task-done" } else { "task" }>
            <input type="checkbox" prop:checked=done disabled=done on:change=complete />
            <div class="task-body">
                <span class="task-title">{task.title.clone()}</span>
                <span class="task-hint">{task.location_hint.clone()}</span>
                <span class="task-notes">{task.notes.clone()}</span>
            </div>
            <span class="task-due">{due}</span>
            <button class="btn btn-icon" title="Delete" on:click=delete>"\u{2715}"</button>
        </li>
    }
}

#[component]
pub fn TasksPage() -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let form = RwSignal::new(TaskForm::default());

    let enter_ctx = ctx.clone();
    Effect::new(move |_| {
        let ctx = enter_ctx.clone();
        spawn_local(async move {
            ctx.client.enter_view(&ctx.state, View::Tasks).await;
        });
    });

    let needs_link = move || {
        state.with(|s| s.link_required || task_gate(s) == TaskGate::NotLinked)
    };

    let create_ctx = ctx.clone();
    let create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let ctx = create_ctx.clone();
        spawn_local(async move {
            let mut draft = form.get_untracked();
            let result = ctx
                .busy_while(Action::CreateTask, ctx.client.create_task(&ctx.state, &mut draft))
                .await;
            match result {
                Ok(task) => {
                    form.set(draft);
                    ctx.toast(ToastSpec::success(format!("Added \u{201C}{}\u{201D}", task.title)));
                }
                Err(err) => ctx.error(&err, ErrorContext::Tasks),
            }
        });
    };

    let refresh_ctx = ctx.clone();
    let busy_ctx = ctx.clone();
    let creating = move || busy_ctx.is_busy(Action::CreateTask);

    let rows = move || {
        state
            .with(|s| s.tasks.clone())
            .into_iter()
            .map(|task| view! { <TaskRow task=task /> })
            .collect_view()
    };
    let list_title = move || {
        state.with(|s| {
            s.default_task_list
                .as_ref()
                .map(|l| l.title.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "My tasks".to_string())
        })
    };

    view! {
        <div class="page tasks-page">
            <Show
                when=move || !needs_link()
                fallback=|| {
                    view! {
                        <section class="link-required">
                            <p>{LINK_GOOGLE_TASKS_MESSAGE}</p>
                            <LinkBadge />
                        </section>
                    }
                }
            >
                <header class="page-header">
                    <h2>{list_title}</h2>
                    <button
                        class="btn btn-secondary"
                        on:click={
                            let ctx = refresh_ctx.clone();
                            move |_| refresh(ctx.clone(), true)
                        }
                    >
                        "Refresh"
                    </button>
                </header>

                <form class="task-form" on:submit=create.clone()>
                    <input
                        type="text"
                        class="input"
                        placeholder="New task"
                        prop:value=move || form.with(|f| f.title.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.title = value);
                        }
                    />
                    <input
                        type="text"
                        class="input"
                        placeholder="Where? (optional)"
                        prop:value=move || form.with(|f| f.location_hint.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.location_hint = value);
                        }
                    />
                    <input
                        type="date"
                        class="input"
                        prop:value=move || form.with(|f| f.due.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.due = value);
                        }
                    />
                    <textarea
                        class="input"
                        placeholder="Notes"
                        prop:value=move || form.with(|f| f.notes.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.notes = value);
                        }
                    ></textarea>
                    <button type="submit" class="btn btn-primary" disabled=creating.clone()>
                        "Add"
                    </button>
                </form>

                <Show
                    when=move || state.with(|s| !s.tasks.is_empty())
                    fallback=|| view! { <p class="empty">"No tasks yet."</p> }
                >
                    <ul class="task-list">{rows}</ul>
                </Show>
            </Show>
        </div>
    }
}
