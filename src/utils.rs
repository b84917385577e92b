pub mod session;

use axum::response::Html;
use tera::{Tera, Context};

pub use session::{current_view_id, forget_view, remember_view};

pub fn render_template(tera: &Tera, template_name: &str, context: Context) -> Html<String> {
    Html(
        tera.render(template_name, &context)
            .unwrap_or_else(|e| {
                log::error!("Error rendering template {}: {}", template_name, e);
                format!("Error rendering template: {}", template_name)
            })
    )
}
