//! Generated stylesheet for the site.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// The gallery's font pairing: SNG Sans for display, Circular for body.
// The faces themselves ship as static files; this only wires the stacks.
const DEFAULT_CSS: &str = r#"/* Galéria theme */

:root {
  --font-display: "SNG Sans", system-ui, -apple-system, sans-serif;
  --font-body: "Circular", system-ui, -apple-system, sans-serif;
  --background: #0b0b0c;
  --foreground: #f4f2ee;
  --muted: #8a8781;
  --accent: #c8a45a;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-body);
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

h1, h2, h3 {
  font-family: var(--font-display);
  font-weight: 600;
}

a {
  color: inherit;
  text-decoration: none;
}

/* Attract screen */

@keyframes scale {
  0%, 100% {
    transform: scale(1);
    opacity: 1;
  }
  50% {
    transform: scale(1.2);
    opacity: 0.1;
  }
}

.attract-scale {
  animation: scale 3s ease-in-out infinite;
}

.attract {
  min-height: 100vh;
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: center;
  gap: 2rem;
  text-align: center;
}

.attract-title {
  font-size: 3rem;
  letter-spacing: 0.04em;
}

.attract-hint {
  color: var(--muted);
  text-transform: uppercase;
  letter-spacing: 0.2em;
  font-size: 0.85rem;
}

.featured {
  list-style: none;
  display: flex;
  flex-wrap: wrap;
  justify-content: center;
  gap: 2rem;
  padding: 0 2rem;
}

.featured-thumb {
  display: block;
  width: 220px;
  height: 220px;
  object-fit: cover;
  border-radius: 0.25rem;
}

.featured-title {
  display: block;
  margin-top: 0.75rem;
  color: var(--muted);
}

/* Artwork page */

.artwork {
  display: grid;
  grid-template-columns: 1fr 320px;
  min-height: 100vh;
}

.viewer {
  display: block;
  width: 100%;
  height: 100vh;
  background: #000;
}

.artwork-meta {
  padding: 2rem;
  border-left: 1px solid #1e1e20;
  display: flex;
  flex-direction: column;
  gap: 1rem;
}

.artwork-author {
  color: var(--accent);
}

.artwork-thumb {
  width: 100%;
  border-radius: 0.25rem;
}

.artwork-back {
  margin-top: auto;
  color: var(--muted);
  text-transform: uppercase;
  letter-spacing: 0.1em;
  font-size: 0.8rem;
}
"#;
