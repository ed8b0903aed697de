//! HTML templates for pages and emails, compiled into the binary.

use crate::errors::{Error, Result};
use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: [(&str, &str); 14] = [
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("about.html", include_str!("../templates/about.html")),
    ("services.html", include_str!("../templates/services.html")),
    ("properties.html", include_str!("../templates/properties.html")),
    ("property_detail.html", include_str!("../templates/property_detail.html")),
    ("property_missing.html", include_str!("../templates/property_missing.html")),
    ("testimonials.html", include_str!("../templates/testimonials.html")),
    ("contact.html", include_str!("../templates/contact.html")),
    ("admin.html", include_str!("../templates/admin.html")),
    ("not_found.html", include_str!("../templates/not_found.html")),
    ("card.html", include_str!("../templates/card.html")),
    (
        "emails/business_notification.html",
        include_str!("../templates/emails/business_notification.html"),
    ),
    ("emails/auto_reply.html", include_str!("../templates/emails/auto_reply.html")),
];

/// Template environment; `.html` templates are rendered with HTML autoescaping
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> anyhow::Result<Self> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| anyhow::anyhow!("Failed to compile template '{name}': {e}"))?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String> {
        let template = self.env.get_template(name).map_err(|e| Error::Internal {
            operation: format!("load template '{name}': {e}"),
        })?;
        template.render(context).map_err(|e| Error::Internal {
            operation: format!("render template '{name}': {e}"),
        })
    }
}
