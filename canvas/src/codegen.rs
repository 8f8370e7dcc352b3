//! Code generator: component model plus resolved theme to React source.
//!
//! Output is a pure function of its inputs. Components are emitted in
//! top-to-bottom order (stable sort on `box.y`, so ties keep model order) and
//! every position is a percentage of the canonical canvas, which makes the
//! generated page resolution-independent. Kinds without a template emit
//! nothing.

#[cfg(test)]
#[path = "codegen_test.rs"]
mod codegen_test;

use crate::consts::CANVAS_SIZE;
use crate::doc::{Component, ComponentKind, DocStore};
use crate::theme::ResolvedTheme;

/// File name offered for the generated source download.
pub const GENERATED_FILE_NAME: &str = "WireframeTemplate.jsx";

const INPUT_PLACEHOLDER: &str = "Enter text...";

/// Generate source for every component in `doc`.
#[must_use]
pub fn generate_from_doc(doc: &DocStore, theme: &ResolvedTheme) -> String {
    generate(&doc.snapshot(), theme)
}

/// Generate a self-contained React component rendering `components`.
#[must_use]
pub fn generate(components: &[Component], theme: &ResolvedTheme) -> String {
    let mut sorted: Vec<&Component> = components.iter().collect();
    sorted.sort_by(|a, b| a.bbox.sanitized().y.total_cmp(&b.bbox.sanitized().y));

    let mut out = String::from("import React from 'react';\n\n");
    out.push_str("const WireframeTemplate = () => {\n");
    out.push_str("  return (\n");
    out.push_str(&format!(
        "    <div className=\"relative w-full max-w-4xl mx-auto aspect-square border rounded-2xl shadow-xl overflow-hidden\" style={{{{{}}}}}>\n",
        style_props(&[
            ("backgroundColor", theme.canvas_background.as_str()),
            ("color", theme.text.as_str()),
            ("borderColor", theme.border.as_str()),
            ("fontFamily", theme.body_font.as_str()),
        ])
    ));

    for component in sorted {
        out.push_str(&fragment(component, theme));
    }

    out.push_str("    </div>\n");
    out.push_str("  );\n");
    out.push_str("};\n\n");
    out.push_str("export default WireframeTemplate;");
    out
}

/// Inline position as percentages of the canonical canvas. Negative or
/// non-finite sizes print as zero, as they would be stored.
#[must_use]
pub fn position_style(component: &Component) -> String {
    let pct = |v: f64| v / CANVAS_SIZE * 100.0;
    let b = component.bbox.sanitized();
    format!(
        "position: 'absolute', left: '{:.2}%', top: '{:.2}%', width: '{:.2}%', height: '{:.2}%'",
        pct(b.x),
        pct(b.y),
        pct(b.width),
        pct(b.height)
    )
}

fn fragment(component: &Component, theme: &ResolvedTheme) -> String {
    let style = theme.style_for(component);
    let pos = position_style(component);
    let background = style.background.clone().unwrap_or_default();
    let radius = format!("{}px", style.border_radius);
    let font_size = format!("{}px", style.font_size);

    let with = |extra: &[(&str, &str)]| {
        let mut s = pos.clone();
        let props = style_props(extra);
        if !props.is_empty() {
            s.push_str(", ");
            s.push_str(&props);
        }
        s
    };

    match component.kind {
        ComponentKind::Input => {
            let placeholder = match component.text.as_deref() {
                Some(t) if !t.is_empty() => t,
                _ => INPUT_PLACEHOLDER,
            };
            format!(
                "      <input className=\"border rounded-lg p-2 w-full h-full\" style={{{{{}}}}} placeholder=\"{}\" />\n",
                with(&[
                    ("backgroundColor", background.as_str()),
                    ("color", style.color.as_str()),
                    ("borderColor", theme.border.as_str()),
                ]),
                escape_attr(placeholder)
            )
        }
        ComponentKind::Button => format!(
            "      <button className=\"rounded-lg p-2 w-full h-full shadow-md hover:opacity-90\" style={{{{{}}}}}>{}</button>\n",
            with(&[
                ("backgroundColor", background.as_str()),
                ("color", style.color.as_str()),
                ("borderRadius", radius.as_str()),
            ]),
            escape_text(component.display_text())
        ),
        ComponentKind::Heading => format!(
            "      <h2 className=\"font-bold\" style={{{{{}}}}}>{}</h2>\n",
            with(&[
                ("color", style.color.as_str()),
                ("fontSize", font_size.as_str()),
                ("fontFamily", theme.heading_font.as_str()),
            ]),
            escape_text(component.display_text())
        ),
        ComponentKind::Text => format!(
            "      <p className=\"text-base\" style={{{{{}}}}}>{}</p>\n",
            with(&[("color", style.color.as_str()), ("fontSize", font_size.as_str())]),
            escape_text(component.display_text())
        ),
        ComponentKind::Checkbox => {
            let mut s = format!(
                "      <div className=\"flex items-center gap-2\" style={{{{{}}}}}>\n",
                with(&[("color", style.color.as_str())])
            );
            s.push_str("        <input type=\"checkbox\" className=\"w-4 h-4\" />\n");
            s.push_str(&format!("        <span>{}</span>\n", escape_text(component.display_text())));
            s.push_str("      </div>\n");
            s
        }
        ComponentKind::Nav => {
            let mut s = format!(
                "      <nav className=\"rounded-md p-3 flex justify-around\" style={{{{{}}}}}>\n",
                with(&[("backgroundColor", background.as_str()), ("color", style.color.as_str())])
            );
            for item in component.menu() {
                s.push_str(&format!(
                    "        <a href=\"#\" className=\"hover:underline\">{}</a>\n",
                    escape_text(item)
                ));
            }
            s.push_str("      </nav>\n");
            s
        }
        ComponentKind::Footer => format!(
            "      <footer className=\"p-3 rounded-md text-center\" style={{{{{}}}}}>{}</footer>\n",
            with(&[("backgroundColor", background.as_str()), ("color", style.color.as_str())]),
            escape_text(component.display_text())
        ),
        ComponentKind::Image => {
            let mut s = format!(
                "      <div className=\"border-2 border-dashed rounded-lg p-2 overflow-hidden\" style={{{{{}}}}}>\n",
                with(&[("borderColor", theme.border.as_str())])
            );
            s.push_str(&format!(
                "        <img src=\"{}\" alt=\"image\" className=\"w-full h-full object-cover rounded-lg\" />\n",
                escape_attr(component.image_source())
            ));
            s.push_str("      </div>\n");
            s
        }
        ComponentKind::Frame => {
            let mut s = format!(
                "      <div className=\"border-2 border-dashed rounded-lg p-2 flex flex-col items-center overflow-hidden\" style={{{{{}}}}}>\n",
                with(&[("borderColor", theme.border.as_str()), ("color", style.color.as_str())])
            );
            s.push_str(&format!(
                "        <img src=\"{}\" alt=\"frame\" className=\"w-full flex-1 object-cover rounded\" />\n",
                escape_attr(component.image_source())
            ));
            s.push_str(&format!(
                "        <span className=\"text-sm\">{}</span>\n",
                escape_text(component.display_text())
            ));
            s.push_str("      </div>\n");
            s
        }
        ComponentKind::Icon => format!(
            "      <img src=\"{}\" alt=\"icon\" className=\"object-contain\" style={{{{{}}}}} />\n",
            escape_attr(component.image_source()),
            pos
        ),
        ComponentKind::Unknown => String::new(),
    }
}

/// `key: 'value'` pairs for an inline style object. Empty values are skipped.
fn style_props(props: &[(&str, &str)]) -> String {
    props
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}: '{}'", escape_js(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape for a single-quoted JS string literal.
fn escape_js(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape JSX child text so braces and tags render literally.
fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' => out.push_str("{'{'}"),
            '}' => out.push_str("{'}'}"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted JSX attribute value.
fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('"', "&quot;")
}
