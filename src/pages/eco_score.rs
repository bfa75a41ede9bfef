use leptos::prelude::*;
use mavigo_core::eco::{badge_board, recent_history};
use mavigo_core::format::format_co2;
use mavigo_core::models::EcoDashboard;
use mavigo_core::View;
use wasm_bindgen_futures::spawn_local;

use crate::context::use_app;

const HISTORY_LIMIT: usize = 10;

fn dashboard_view(dashboard: EcoDashboard) -> impl IntoView {
    let badges = badge_board(&dashboard)
        .into_iter()
        .map(|tile| {
            let class = if tile.earned { "badge-tile earned" } else { "badge-tile locked" };
            let earned_at = tile.earned_at.map(|d| format!("Earned {}", d.chars().take(10).collect::<String>()));
            view! {
                <li class=class title=tile.badge.description.clone().unwrap_or_default()>
                    <span class="badge-icon">
                        {tile.badge.icon.clone().unwrap_or_else(|| "\u{1F3C5}".to_string())}
                    </span>
                    <span class="badge-name">{tile.badge.name.clone()}</span>
                    <span class="badge-date">{earned_at}</span>
                </li>
            }
        })
        .collect_view();

    let history = recent_history(&dashboard, HISTORY_LIMIT)
        .into_iter()
        .map(|entry| {
            view! {
                <tr>
                    <td>{entry.date.clone().unwrap_or_default()}</td>
                    <td>{entry.journey_label.clone().unwrap_or_default()}</td>
                    <td>{format!("{:.1} km", entry.distance_km)}</td>
                    <td>{format_co2(entry.co2_saved_kg)}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <section class="eco-totals">
            <div class="stat">
                <span class="stat-value">{format_co2(dashboard.total_co2_saved_kg)}</span>
                <span class="stat-label">"CO\u{2082} saved"</span>
            </div>
            <div class="stat">
                <span class="stat-value">{format!("{:.1} km", dashboard.total_distance_km)}</span>
                <span class="stat-label">"travelled"</span>
            </div>
            <div class="stat">
                <span class="stat-value">{dashboard.journeys_count}</span>
                <span class="stat-label">"journeys"</span>
            </div>
        </section>

        <section class="eco-badges">
            <h3>"Badges"</h3>
            <ul class="badge-board">{badges}</ul>
        </section>

        <section class="eco-history">
            <h3>"Recent journeys"</h3>
            <table class="history-table">
                <thead>
                    <tr>
                        <th>"Date"</th>
                        <th>"Journey"</th>
                        <th>"Distance"</th>
                        <th>"CO\u{2082} saved"</th>
                    </tr>
                </thead>
                <tbody>{history}</tbody>
            </table>
        </section>
    }
}

#[component]
pub fn EcoScorePage() -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;

    let enter_ctx = ctx.clone();
    Effect::new(move |_| {
        let ctx = enter_ctx.clone();
        spawn_local(async move {
            ctx.client.enter_view(&ctx.state, View::EcoScore).await;
        });
    });

    view! {
        <div class="page eco-page">
            <h2>"Eco-score"</h2>
            {move || match state.with(|s| s.eco.clone()) {
                Some(dashboard) => dashboard_view(dashboard).into_any(),
                None => view! { <p class="loading">"Loading\u{2026}"</p> }.into_any(),
            }}
        </div>
    }
}
