use contracts::dashboards::d410_telecaller_reports::ReferenceOption;
use leptos::prelude::*;
use thaw::*;

use super::actions::{after_commit, schedule_reference_search, spawn_reference_fetch, ReportsCtx};
use crate::dashboards::d410_telecaller_reports::state::ReferenceKind;
use crate::shared::icons::icon;
use crate::shared::incremental_search::Selection;

/// Поле выбора из большого справочника с поиском и догрузкой при прокрутке
#[component]
pub fn ReferencePicker(
    ctx: ReportsCtx,
    kind: ReferenceKind,
    #[prop(into)] label: String,
    /// Подпись варианта "Все …"
    #[prop(into)]
    all_label: String,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    let state = ctx.state;
    let is_open = RwSignal::new(false);
    let threshold = ctx.config.with_value(|c| c.paging.load_more_threshold_px);

    let open = move || {
        is_open.set(true);
        if let Some(request) = state.try_update(|s| kind.search_mut(s).open()).flatten() {
            spawn_reference_fetch(ctx, kind, request);
        }
    };

    let choose = move |value: String| {
        is_open.set(false);
        let outcome = state.try_update(|s| {
            let selection = kind.search_mut(s).select(&value);
            s.coordinator
                .edit_draft(|draft| kind.set_facet(draft, selection.value()));
            s.coordinator.commit_draft()
        });
        if let Some(outcome) = outcome {
            after_commit(ctx, outcome);
        }
    };

    let on_scroll = move |ev: leptos::ev::Event| {
        let el = event_target::<web_sys::Element>(&ev);
        let request = state
            .try_update(|s| {
                let search = kind.search_mut(s);
                if search.should_load_more(
                    el.scroll_top(),
                    el.client_height(),
                    el.scroll_height(),
                    threshold,
                ) {
                    search.load_more()
                } else {
                    None
                }
            })
            .flatten();
        if let Some(request) = request {
            spawn_reference_fetch(ctx, kind, request);
        }
    };

    let clear = move |_| {
        if let Some(request) = state.try_update(|s| kind.search_mut(s).clear()).flatten() {
            spawn_reference_fetch(ctx, kind, request);
        }
    };

    let current_label = {
        let all_label = all_label.clone();
        move || {
            state.with(|s| {
                let search = kind.search(s);
                match search.selection() {
                    Selection::Value(value) => search
                        .selected_label()
                        .map(str::to_string)
                        .unwrap_or_else(|| value.clone()),
                    Selection::All | Selection::Unset => all_label.clone(),
                }
            })
        }
    };

    let option_row = move |option: ReferenceOption| {
        let value = option.select_value.clone();
        let selected = move || {
            state.with(|s| kind.search(s).selection().value() == Some(value.as_str()))
        };
        let value = option.select_value.clone();
        view! {
            <div
                class=move || if selected() { "picker__option picker__option--selected" } else { "picker__option" }
                on:mousedown=move |ev| {
                    ev.prevent_default();
                    choose(value.clone());
                }
            >
                {option.display_label}
            </div>
        }
    };

    view! {
        <div class="picker">
            <Flex vertical=true gap=FlexGap::Small>
                <Label>{label}</Label>
                <div class="picker__control">
                    <input
                        class="picker__input"
                        type="text"
                        placeholder=move || {
                            if is_open.get() { placeholder.clone() } else { current_label() }
                        }
                        prop:value=move || state.with(|s| kind.search(s).input().to_string())
                        on:focus=move |_| open()
                        on:blur=move |_| is_open.set(false)
                        on:input=move |ev| {
                            schedule_reference_search(ctx, kind, event_target_value(&ev));
                        }
                    />
                    <span class="picker__clear" title="Clear search" on:mousedown=clear>
                        {icon("x")}
                    </span>
                </div>
                <Show when=move || is_open.get()>
                    <div class="picker__list" on:scroll=on_scroll>
                        <div
                            class="picker__option picker__option--all"
                            on:mousedown={
                                move |ev| {
                                    ev.prevent_default();
                                    choose(String::new());
                                }
                            }
                        >
                            {all_label.clone()}
                        </div>
                        {move || {
                            state
                                .with(|s| kind.search(s).items().to_vec())
                                .into_iter()
                                .map(option_row)
                                .collect_view()
                        }}
                        {move || {
                            state.with(|s| {
                                let search = kind.search(s);
                                if let Some(error) = search.error() {
                                    view! { <div class="picker__status picker__status--error">{error.to_string()}</div> }.into_any()
                                } else if search.is_loading() {
                                    view! { <div class="picker__status">"Loading…"</div> }.into_any()
                                } else if search.is_loaded() && search.items().is_empty() {
                                    view! { <div class="picker__status">"No matches"</div> }.into_any()
                                } else {
                                    view! { <></> }.into_any()
                                }
                            })
                        }}
                    </div>
                </Show>
            </Flex>
        </div>
    }
}
