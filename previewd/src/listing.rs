//! Listing pages
//!
//! Renders an inventory (or a single directory's flat listing) to HTML.
//! Pure templating over the data the core hands us; no filesystem access.

use previewd_core::{Listing, PreviewConfig};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 40px; }\n\
h1 { color: #333; }\n\
ul { list-style-type: none; padding: 0; }\n\
li { margin: 10px 0; }\n\
a { display: block; padding: 10px; background: #f4f4f4; text-decoration: none; color: #333; border-radius: 4px; }\n\
a:hover { background: #e0e0e0; }\n\
.info { background: #e7f3ff; padding: 15px; border-radius: 4px; margin: 20px 0; }\n";

/// Render a listing decision to a full HTML page
pub fn render(listing: &Listing, config: &PreviewConfig) -> String {
    match listing {
        Listing::Inventory(inventory) => render_inventory(inventory, config),
        Listing::Directory { label, entries } => render_directory(label, entries, config),
    }
}

fn render_inventory(inventory: &previewd_core::Inventory, config: &PreviewConfig) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Previewd Directory</title>\n<style>\n{}</style>\n</head>\n<body>\n<h1>Available Content</h1>\n",
        STYLE
    );

    html.push_str(&format!(
        "<div class=\"info\"><strong>Server Info:</strong><br>\
         &bull; Running on: http://{}<br>\
         &bull; Serving from: {}<br>\
         &bull; Found {} project(s) and {} HTML file(s)</div>\n",
        escape(&config.listen_addr()),
        escape(&config.working_dir.display().to_string()),
        inventory.projects.len(),
        inventory.standalone_files.len(),
    ));

    if inventory.projects.is_empty() {
        html.push_str("<p>No projects found.</p>\n");
    } else {
        html.push_str(&format!("<h2>Projects ({})</h2>\n<ul>\n", inventory.projects.len()));
        for project in &inventory.projects {
            // Link to the bare project path; the server redirects to the entry file
            let entry = project.entry_file.as_deref().unwrap_or("(no entry file)");
            html.push_str(&format!(
                "<li><a href=\"/{}\">{} &rarr; {}</a></li>\n",
                encode_href(&project.relative_path),
                escape(&project.name),
                escape(entry),
            ));
        }
        html.push_str("</ul>\n");
    }

    if inventory.standalone_files.is_empty() {
        html.push_str("<p>No HTML files found.</p>\n");
    } else {
        html.push_str(&format!(
            "<h2>HTML Files ({})</h2>\n<ul>\n",
            inventory.standalone_files.len()
        ));
        for file in &inventory.standalone_files {
            html.push_str(&format!(
                "<li><a href=\"/{}\">{}</a></li>\n",
                encode_href(&file.relative_path),
                escape(&file.name),
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<h2>Directory Contents</h2>\n<ul>\n");
    for file in inventory
        .standalone_files
        .iter()
        .chain(inventory.other_files.iter())
    {
        html.push_str(&format!("<li>{} {}</li>\n", icon_for(&file.name), escape(&file.name)));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn render_directory(
    label: &str,
    entries: &[previewd_core::probe::ProbedEntry],
    config: &PreviewConfig,
) -> String {
    let mut html = format!(
        "<html><head><title>Index of {}</title></head><body><h1>Index of {}</h1><hr><pre>",
        escape(label),
        escape(label)
    );

    html.push_str("<a href=\"/\">../</a>\n");

    for entry in entries {
        let display_name = if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        // Absolute hrefs: the listing is served from the bare project path,
        // so relative links would resolve one level too high
        html.push_str(&format!(
            "<a href=\"/{}/{}/{}\">{}</a>\n",
            encode_segment(&config.projects_root),
            encode_segment(label),
            encode_segment(&entry.name),
            escape(&display_name)
        ));
    }

    html.push_str("</pre><hr></body></html>");
    html
}

fn icon_for(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("html") | Some("htm") => "\u{1F4C4}",
        Some("css") => "\u{1F3A8}",
        Some("js") => "\u{26A1}",
        _ => "\u{1F4C1}",
    }
}

/// Percent-encode one path segment for an href. Covers the ASCII characters
/// that would break the URL or the surrounding attribute; multibyte
/// characters pass through untouched.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' | '#' | '?' | ' ' | '"' | '\'' | '<' | '>' | '&' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

fn encode_href(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
