//! Self-contained HTML page wrapping for diagram views.

/// Wraps SVG markup in a standalone HTML page that fills the viewport.
///
/// The page carries no scripts and no external references; it is a
/// snapshot sharing no state with the live surface.
pub fn standalone_page(title: &str, svg_markup: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         <style>\n\
         html, body {{ margin: 0; height: 100%; background: #fff; }}\n\
         svg {{ display: block; width: 100vw; height: 100vh; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         {}\n\
         </body>\n\
         </html>\n",
        escape_text(title),
        svg_markup
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_markup_and_title() {
        let page = standalone_page("Order Flow", "<svg></svg>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Order Flow</title>"));
        assert!(page.contains("<svg></svg>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let page = standalone_page("a < b & c", "<svg></svg>");
        assert!(page.contains("<title>a &lt; b &amp; c</title>"));
    }
}
