//! Comfort profile editor plus the user's named comfort settings.

use leptos::prelude::*;
use mavigo_core::comfort::comfort_summary;
use mavigo_core::models::{ComfortProfile, ComfortSetting, DirectPathPolicy};
use mavigo_core::toast::ToastSpec;
use mavigo_core::{Action, ErrorContext, StateHandle};
use wasm_bindgen_futures::spawn_local;

use crate::context::use_app;

fn parse_limit(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

fn limit_text(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn direct_path_value(policy: Option<DirectPathPolicy>) -> &'static str {
    match policy {
        Some(DirectPathPolicy::Only) => "only",
        Some(DirectPathPolicy::Preferred) => "preferred",
        Some(DirectPathPolicy::Indifferent) => "indifferent",
        None => "",
    }
}

fn parse_direct_path(raw: &str) -> Option<DirectPathPolicy> {
    match raw {
        "only" => Some(DirectPathPolicy::Only),
        "preferred" => Some(DirectPathPolicy::Preferred),
        "indifferent" => Some(DirectPathPolicy::Indifferent),
        _ => None,
    }
}

#[component]
pub fn ComfortPanel(on_close: Callback<()>) -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let initial = state.read(|s| s.user.as_ref().and_then(|u| u.comfort_profile.clone()));
    let profile = RwSignal::new(initial.unwrap_or_default());
    let (setting_name, set_setting_name) = signal(String::new());

    // Load named settings on mount
    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        let ctx = load_ctx.clone();
        spawn_local(async move {
            if let Err(err) = ctx.client.load_comfort_settings(&ctx.state).await {
                ctx.error(&err, ErrorContext::General);
            }
        });
    });

    let save_ctx = ctx.clone();
    let save = move |_| {
        let ctx = save_ctx.clone();
        let draft = profile.get_untracked();
        spawn_local(async move {
            let result = ctx
                .busy_while(
                    Action::SaveComfortProfile,
                    ctx.client.save_comfort_profile(&ctx.state, &draft),
                )
                .await;
            match result {
                Ok(_) => {
                    ctx.toast(ToastSpec::success("Comfort preferences saved"));
                    on_close.run(());
                }
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
        });
    };

    let clear_ctx = ctx.clone();
    let clear = move |_| {
        let ctx = clear_ctx.clone();
        spawn_local(async move {
            match ctx.client.clear_comfort_profile(&ctx.state).await {
                Ok(_) => {
                    profile.set(ComfortProfile::default());
                    ctx.toast(ToastSpec::info("Comfort preferences cleared"));
                }
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
        });
    };

    let save_as_ctx = ctx.clone();
    let save_as = move |_| {
        let ctx = save_as_ctx.clone();
        let setting = ComfortSetting {
            id: None,
            name: setting_name.get_untracked(),
            profile: profile.get_untracked(),
        };
        spawn_local(async move {
            match ctx.client.save_comfort_setting(&ctx.state, &setting).await {
                Ok(saved) => {
                    set_setting_name.set(String::new());
                    ctx.toast(ToastSpec::success(format!("Saved \u{201C}{}\u{201D}", saved.name)));
                }
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
        });
    };

    let busy_ctx = ctx.clone();
    let saving = move || busy_ctx.is_busy(Action::SaveComfortProfile);

    let list_ctx = ctx.clone();
    let settings_list = move || {
        let ctx = list_ctx.clone();
        state
            .with(|s| s.comfort_settings.clone())
            .into_iter()
            .map(|setting| {
                let applied = setting.profile.clone();
                let id = setting.id.clone().unwrap_or_default();
                let ctx = ctx.clone();
                let delete = move |_| {
                    let ctx = ctx.clone();
                    let id = id.clone();
                    spawn_local(async move {
                        if let Err(err) = ctx.client.delete_comfort_setting(&ctx.state, &id).await {
                            ctx.error(&err, ErrorContext::General);
                        }
                    });
                };
                view! {
                    <li class="comfort-setting">
                        <button class="link" on:click=move |_| profile.set(applied.clone())>
                            {setting.name.clone()}
                        </button>
                        <span class="comfort-setting-summary">
                            {comfort_summary(Some(&setting.profile))}
                        </span>
                        <button class="btn btn-icon" title="Delete" on:click=delete>
                            "\u{2715}"
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <div class="comfort-panel">
            <h4>"Comfort settings"</h4>
            <p class="comfort-summary">{move || profile.with(|p| comfort_summary(Some(p)))}</p>

            <div class="form-group">
                <label for="direct-path">"Direct routes"</label>
                <select
                    id="direct-path"
                    class="input"
                    prop:value=move || profile.with(|p| direct_path_value(p.direct_path))
                    on:change=move |ev| {
                        let policy = parse_direct_path(&event_target_value(&ev));
                        profile.update(|p| p.direct_path = policy);
                    }
                >
                    <option value="">"No preference"</option>
                    <option value="only">"Direct only"</option>
                    <option value="preferred">"Prefer direct"</option>
                    <option value="indifferent">"Indifferent"</option>
                </select>
            </div>

            <label class="checkbox">
                <input
                    type="checkbox"
                    prop:checked=move || profile.with(|p| p.require_air_conditioning)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        profile.update(|p| p.require_air_conditioning = checked);
                    }
                />
                "Air-conditioned vehicles only"
            </label>

            <div class="form-row">
                <label>
                    "Max transfers"
                    <input
                        type="number"
                        min="0"
                        class="input input-small"
                        prop:value=move || profile.with(|p| limit_text(p.max_nb_transfers))
                        on:input=move |ev| {
                            let value = parse_limit(&event_target_value(&ev));
                            profile.update(|p| p.max_nb_transfers = value);
                        }
                    />
                </label>
                <label>
                    "Max wait (min)"
                    <input
                        type="number"
                        min="0"
                        class="input input-small"
                        prop:value=move || profile.with(|p| limit_text(p.max_waiting_duration))
                        on:input=move |ev| {
                            let value = parse_limit(&event_target_value(&ev));
                            profile.update(|p| p.max_waiting_duration = value);
                        }
                    />
                </label>
                <label>
                    "Max walk (min)"
                    <input
                        type="number"
                        min="0"
                        class="input input-small"
                        prop:value=move || profile.with(|p| limit_text(p.max_walking_duration))
                        on:input=move |ev| {
                            let value = parse_limit(&event_target_value(&ev));
                            profile.update(|p| p.max_walking_duration = value);
                        }
                    />
                </label>
            </div>

            <div class="dialog-actions">
                <button class="btn btn-secondary" on:click=move |_| on_close.run(())>"Close"</button>
                <button class="btn btn-secondary" on:click=clear>"Clear"</button>
                <button class="btn btn-primary" disabled=saving on:click=save>"Save"</button>
            </div>

            <h5>"Saved settings"</h5>
            <ul class="comfort-settings">{settings_list}</ul>
            <div class="input-row">
                <input
                    type="text"
                    class="input"
                    placeholder="Name these settings"
                    prop:value=move || setting_name.get()
                    on:input=move |ev| set_setting_name.set(event_target_value(&ev))
                />
                <button class="btn btn-save" on:click=save_as>"Save as"</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_parse_blank_as_unset() {
        assert_eq!(parse_limit(""), None);
        assert_eq!(parse_limit(" 3 "), Some(3));
        assert_eq!(parse_limit("-1"), None);
        assert_eq!(limit_text(None), "");
    }

    #[test]
    fn test_direct_path_select_values() {
        for policy in [
            None,
            Some(DirectPathPolicy::Only),
            Some(DirectPathPolicy::Preferred),
            Some(DirectPathPolicy::Indifferent),
        ] {
            assert_eq!(parse_direct_path(direct_path_value(policy)), policy);
        }
    }
}
