use crate::shared::date_utils::{format_input_date, parse_input_date};
use chrono::NaiveDate;
use leptos::prelude::*;

/// DateInput component with native date picker
///
/// Clearing the input yields `None`.
#[component]
pub fn DateInput(
    #[prop(into)] value: Signal<Option<NaiveDate>>,
    on_change: impl Fn(Option<NaiveDate>) + 'static,
    /// Upper bound for the picker (e.g. the end of a range)
    #[prop(optional, into)]
    max: Signal<Option<NaiveDate>>,
    /// Lower bound for the picker (e.g. the start of a range)
    #[prop(optional, into)]
    min: Signal<Option<NaiveDate>>,
) -> impl IntoView {
    view! {
        <input
            type="date"
            class="date-input"
            prop:value=move || format_input_date(value.get())
            min=move || format_input_date(min.get())
            max=move || format_input_date(max.get())
            on:change=move |ev| {
                on_change(parse_input_date(&event_target_value(&ev)));
            }
        />
    }
}
