use crate::dashboards::d410_telecaller_reports::config::{load_config, ReportsConfig};
use crate::dashboards::TelecallerReportsDashboard;
use crate::system::auth::AuthContext;
use leptos::prelude::*;

/// Id of an optional `<script type="application/toml">` block with config overrides
const CONFIG_ELEMENT_ID: &str = "reports-config";

fn config_override() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let text = document.get_element_by_id(CONFIG_ELEMENT_ID)?.text_content()?;
    Some(text).filter(|t| !t.trim().is_empty())
}

fn resolve_config() -> ReportsConfig {
    let override_toml = config_override();
    match load_config(override_toml.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}; falling back to defaults", e);
            ReportsConfig::default()
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = resolve_config();
    let auth = AuthContext::browser();

    view! {
        <TelecallerReportsDashboard config=config auth=auth />
    }
}
