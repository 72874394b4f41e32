//! Page module serialization.
//!
//! Each compiled document becomes a TypeScript module exporting a `page`
//! object: the rendered HTML as a template literal, the image map binding
//! generated ids to imported assets, and the metadata object (breadcrumbs,
//! navigation, and front-matter passthrough keys).

use serde_json::{Map, Value};

use crate::navigation::Anchor;
use crate::structure::RouteLink;

/// Package name used for the type import in generated modules.
const MODULE_NAME: &str = "md2ts";

/// One emitted page artifact.
#[derive(Clone, Debug)]
pub struct PageModule {
    /// Rendered HTML fragment.
    pub html: String,
    /// Image map as `(source attribute, generated id)` pairs, in
    /// first-occurrence order.
    pub images: Vec<(String, String)>,
    /// Metadata object serialized into the module.
    pub metadata: Map<String, Value>,
}

/// Assemble the metadata object for a page.
///
/// Starts from the front-matter passthrough keys, removes `title` (the
/// page title is implicit in the last breadcrumb), and adds the
/// breadcrumb chain and navigation tree.
pub fn build_metadata(
    mut fields: Map<String, Value>,
    breadcrumbs: &[RouteLink],
    navigation: &[Anchor],
) -> Result<Map<String, Value>, serde_json::Error> {
    fields.remove("title");
    fields.insert("breadcrumbs".to_owned(), serde_json::to_value(breadcrumbs)?);
    fields.insert("navigation".to_owned(), serde_json::to_value(navigation)?);
    Ok(fields)
}

/// Render a page module to TypeScript source.
pub fn render_module(module: &PageModule) -> Result<String, serde_json::Error> {
    let mut out = String::with_capacity(module.html.len() + 512);

    out.push_str("/* eslint-disable */\n");
    out.push_str(&format!("import type {{ Md2Ts }} from '{MODULE_NAME}';\n"));
    for (src, id) in &module.images {
        out.push_str(&format!("import {id} from './{src}';\n"));
    }

    out.push('\n');
    out.push_str("export const page: Md2Ts.Page = {\n");
    out.push_str(&format!("  html: `{}`,\n", escape_template(&module.html)));

    let ids: Vec<&str> = module.images.iter().map(|(_, id)| id.as_str()).collect();
    out.push_str(&format!("  images: {{ {} }},\n", ids.join(", ")));

    let metadata = serde_json::to_string_pretty(&module.metadata)?;
    out.push_str(&format!("  metadata: {metadata},\n"));
    out.push_str("};\n");

    Ok(out)
}

/// Escape HTML for embedding in a template literal.
fn escape_template(html: &str) -> String {
    html.replace('`', "\\`").replace("${", "\\${")
}
