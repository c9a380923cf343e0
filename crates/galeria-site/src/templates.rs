//! Template engine for rendering the site's pages.

use minijinja::{context, Environment};

/// Custom element prefix reserved for the external viewer widget. Tags
/// outside this namespace are not rendered as viewer embeds.
pub const VIEWER_ELEMENT_PREFIX: &str = "micr-";

/// Whether a tag names the external viewer's custom element.
pub fn is_viewer_element(tag: &str) -> bool {
    tag.strip_prefix(VIEWER_ELEMENT_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// A featured artwork shown on the attract screen.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FeaturedArtwork {
    /// Collection id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Thumbnail URL.
    pub thumbnail: String,
}

/// Context for the home / attract page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HomePage {
    /// Site title.
    pub site_title: String,
    /// Extra stylesheet links.
    pub styles: Vec<String>,
    /// Artworks highlighted on the attract screen.
    pub featured: Vec<FeaturedArtwork>,
}

/// Context for an artwork detail page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtworkPage {
    /// Site title.
    pub site_title: String,
    /// Extra stylesheet links.
    pub styles: Vec<String>,
    /// Artwork title.
    pub title: String,
    /// Author line, when the record carries one.
    pub author: Option<String>,
    /// Display thumbnail URL.
    pub thumbnail: String,
    /// The viewer widget's custom element tag.
    pub viewer_tag: String,
    /// Image id handed to the viewer element.
    pub viewer_image_id: String,
}

/// Errors that can occur while rendering pages.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("'{0}' is not an allowed viewer element tag")]
    UnknownViewerTag(String),

    #[error("render error: {0}")]
    Render(#[from] minijinja::Error),
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in page templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");
        env.add_template_owned("home.html".to_string(), HOME_TEMPLATE.to_string())
            .expect("Failed to add home template");
        env.add_template_owned("artwork.html".to_string(), ARTWORK_TEMPLATE.to_string())
            .expect("Failed to add artwork template");

        Self { env }
    }

    /// Render the home / attract page.
    pub fn render_home(&self, page: &HomePage) -> Result<String, TemplateError> {
        let tmpl = self.env.get_template("home.html")?;

        Ok(tmpl.render(context! {
            title => "Zbierka",
            site_title => &page.site_title,
            styles => &page.styles,
            featured => &page.featured,
        })?)
    }

    /// Render an artwork detail page. The viewer tag must belong to the
    /// viewer element namespace.
    pub fn render_artwork(&self, page: &ArtworkPage) -> Result<String, TemplateError> {
        if !is_viewer_element(&page.viewer_tag) {
            return Err(TemplateError::UnknownViewerTag(page.viewer_tag.clone()));
        }

        let tmpl = self.env.get_template("artwork.html")?;

        Ok(tmpl.render(context! {
            title => &page.title,
            site_title => &page.site_title,
            styles => &page.styles,
            author => &page.author,
            thumbnail => &page.thumbnail,
            viewer_tag => &page.viewer_tag,
            viewer_image_id => &page.viewer_image_id,
        })?)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="sk">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}<link rel="stylesheet" href="/assets/main.css">
</head>
<body>
  {% block content %}{% endblock %}
  <script src="/assets/kiosk.js"></script>
</body>
</html>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<main class="attract">
  <h1 class="attract-title">{{ site_title }}</h1>
  <p class="attract-hint">Dotknite sa obrazovky</p>
  {% if featured %}
  <ul class="featured">
  {% for artwork in featured %}
    <li class="featured-item">
      <a href="/dielo/{{ artwork.id }}">
        <img class="featured-thumb attract-scale" src="{{ artwork.thumbnail }}" alt="{{ artwork.title }}">
        <span class="featured-title">{{ artwork.title }}</span>
      </a>
    </li>
  {% endfor %}
  </ul>
  {% endif %}
</main>
{% endblock %}"##;

const ARTWORK_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<main class="artwork">
  <{{ viewer_tag }} class="viewer" id="{{ viewer_image_id }}" data-ui="minimal"></{{ viewer_tag }}>
  <aside class="artwork-meta">
    <h1>{{ title }}</h1>
    {% if author %}<p class="artwork-author">{{ author }}</p>{% endif %}
    <img class="artwork-thumb" src="{{ thumbnail }}" alt="{{ title }}">
    <a class="artwork-back" href="/">Späť na zbierku</a>
  </aside>
</main>
{% endblock %}"##;
