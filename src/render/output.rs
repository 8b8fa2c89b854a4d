//! Three-layer report renderer.

use std::collections::BTreeSet;

use super::context::Context;
use super::template::{Template, TemplateError};
use crate::config::{Fragment, FormatSet, Guard, Layer};
use crate::error::EXIT_NO_RESULTS;
use crate::results::model::{PackageDisplay, PathDisplay, VersionDisplay};
use crate::results::{PackageGroup, PathGroup, ResultSet, VersionGroup};
use crate::sources::Query;

/// How a render ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// At least one package was rendered.
    Matched,
    /// The result set was empty; `noresult` was emitted.
    NoResults,
}

impl Outcome {
    /// Process exit status for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Matched => 0,
            Self::NoResults => EXIT_NO_RESULTS,
        }
    }
}

/// Complete report text and how the render ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    /// Text to print, unmodified.
    pub text: String,
    /// Outcome deciding the exit code.
    pub outcome: Outcome,
}

/// What: Fields describing the query, visible at every layer.
///
/// Inputs:
/// - `query`: Resolved query.
/// - `req_url`: URL the request was sent to.
///
/// Details:
/// - Holds text fields only; lists render with the format set's `sep`.
#[must_use]
pub fn query_context(query: &Query, req_url: &str) -> Context {
    let mut ctx = Context::default();
    for (key, value) in query.fields() {
        ctx.insert(key, value);
    }
    ctx.insert("req_url", req_url);
    ctx
}

fn package_fields(ctx: &mut Context, pkg: &PackageGroup) {
    ctx.insert("c", pkg.category.as_str());
    ctx.insert("p", pkg.package.as_str());
    ctx.insert("cp_pfl", pkg.link.as_str());
    if pkg.enriched {
        ctx.insert("homepage", pkg.homepage.as_str());
        ctx.insert("description", pkg.description.as_str());
        ctx.insert("ver_installed", pkg.installed_versions.as_slice());
        ctx.insert("ver_available", pkg.available_versions.as_slice());
        ctx.insert("exists", pkg.exists);
        ctx.insert("installed_flag", pkg.installed_flag.to_string());
    }
    if let Some(d) = &pkg.display {
        ctx.insert("path_all", d.path_all.as_slice());
        ctx.insert("path_all_exists", d.path_all_exists.as_slice());
        ctx.insert("path_all_str", d.path_all_str.as_str());
        ctx.insert("path_all_str_hl", d.path_all_str_hl.as_str());
        ctx.insert("ver_all", d.ver_all.as_slice());
        ctx.insert("ver_all_str", d.ver_all_str.as_str());
        ctx.insert("ver_all_str_hl", d.ver_all_str_hl.as_str());
        ctx.insert("ver_available_str", d.ver_available_str.as_str());
        ctx.insert("ver_available_str_hl", d.ver_available_str_hl.as_str());
        ctx.insert("ver_installed_str", d.ver_installed_str.as_str());
        ctx.insert("ver_installed_str_hl", d.ver_installed_str_hl.as_str());
        ctx.insert("exists_str", d.exists_str.as_str());
        ctx.insert("symbol", d.symbol.as_str());
    }
}

fn version_fields(vg: &VersionGroup, list_sep: &str) -> Context {
    let mut ctx = Context::new(list_sep);
    ctx.insert("cpv", vg.cpv.as_str());
    ctx.insert("ver_pfl", vg.link.as_str());
    if let Some(d) = &vg.display {
        ctx.insert("exists", vg.exists);
        ctx.insert("installed_flag", vg.installed_flag.to_string());
        ctx.insert("path_all", d.path_all.as_slice());
        ctx.insert("path_all_exists", d.path_all_exists.as_slice());
        ctx.insert("path_all_str", d.path_all_str.as_str());
        ctx.insert("path_all_str_hl", d.path_all_str_hl.as_str());
        ctx.insert("ver_hl", d.ver_hl.as_str());
        ctx.insert("cpv_hl", d.cpv_hl.as_str());
        ctx.insert("exists_str", d.exists_str.as_str());
        ctx.insert("symbol", d.symbol.as_str());
    }
    ctx
}

fn path_fields(pg: &PathGroup, list_sep: &str) -> Context {
    let mut ctx = Context::new(list_sep);
    ctx.insert("type", pg.file_types.as_slice());
    ctx.insert("arch", pg.architectures.as_slice());
    ctx.insert("use", pg.use_flags.as_slice());
    if let Some(d) = &pg.display {
        ctx.insert("exists", pg.exists);
        ctx.insert("type_str", d.type_str.as_str());
        ctx.insert("arch_str", d.arch_str.as_str());
        ctx.insert("use_str", d.use_str.as_str());
        ctx.insert("exists_str", d.exists_str.as_str());
        ctx.insert("path_hl", d.path_hl.as_str());
    }
    ctx
}

/// What: Render one sub-fragment, honouring its guard.
///
/// Output:
/// - Rendered text, `""` when the guard rejects, or an error when the guard
///   field or a template field is undefined.
fn eval_fragment(fragment: &Fragment, ctx: &Context) -> Result<String, TemplateError> {
    let pass = match &fragment.guard {
        None => true,
        Some(guard) => {
            let value = ctx
                .get(guard.field())
                .ok_or_else(|| TemplateError::UndefinedField {
                    template: fragment.key.clone(),
                    field: guard.field().to_string(),
                })?;
            match guard {
                Guard::If(_) => value.is_truthy(),
                Guard::IfNot(_) => !value.is_truthy(),
            }
        }
    };
    if pass {
        fragment.template.render(ctx)
    } else {
        Ok(String::new())
    }
}

/// What: Per-layer text accumulated across sibling entries.
///
/// Details:
/// - Holds the layer template's output plus one slot per sub-fragment;
///   `separate` appends each slot's `sep_<key>` between entries.
struct Accumulator {
    slots: Vec<(String, String)>,
}

impl Accumulator {
    fn new(fmt: &FormatSet, layer: Layer) -> Self {
        let slots = Self::keys(fmt, layer)
            .map(|key| (key.to_string(), String::new()))
            .collect();
        Self { slots }
    }

    /// Keys injected into the parent layer: every fragment, then the layer itself.
    fn keys(fmt: &FormatSet, layer: Layer) -> impl Iterator<Item = &str> {
        fmt.fragments(layer)
            .iter()
            .map(|f| f.key.as_str())
            .chain(std::iter::once(layer.key()))
    }

    fn push(&mut self, key: &str, text: &str) {
        if let Some((_, acc)) = self.slots.iter_mut().find(|(k, _)| k == key) {
            acc.push_str(text);
        }
    }

    fn separate(&mut self, fmt: &FormatSet) {
        for (key, acc) in &mut self.slots {
            acc.push_str(fmt.separator(key));
        }
    }

    fn inject(self, ctx: &mut Context) {
        for (key, acc) in self.slots {
            ctx.insert(key, acc);
        }
    }
}

/// What: Evaluate a layer's fragments and template for one entry.
fn render_entry(
    fmt: &FormatSet,
    layer: Layer,
    ctx: &mut Context,
    acc: Option<&mut Accumulator>,
) -> Result<String, TemplateError> {
    let mut fragments = Vec::with_capacity(fmt.fragments(layer).len());
    for fragment in fmt.fragments(layer) {
        let text = eval_fragment(fragment, ctx)?;
        ctx.insert(fragment.key.as_str(), text.as_str());
        fragments.push((fragment.key.as_str(), text));
    }
    let text = fmt.layer(layer).render(ctx)?;
    if let Some(acc) = acc {
        for (key, fragment_text) in &fragments {
            acc.push(key, fragment_text);
        }
        acc.push(layer.key(), &text);
    }
    Ok(text)
}

fn render_package(
    fmt: &FormatSet,
    query_ctx: &Context,
    cp: &str,
    pkg: &PackageGroup,
) -> Result<String, TemplateError> {
    let sep = fmt.list_sep();
    let mut pkg_ctx = Context::new(sep);
    pkg_ctx.extend_from(query_ctx);
    package_fields(&mut pkg_ctx, pkg);
    pkg_ctx.insert("cp", cp);

    let mut versions = Accumulator::new(fmt, Layer::Version);
    let version_count = pkg.versions.len();
    for (i, (ver, vg)) in pkg.versions.iter().enumerate() {
        let mut ver_ctx = Context::new(sep);
        ver_ctx.insert_prefixed("lvver_", &version_fields(vg, sep));
        ver_ctx.extend_from(&pkg_ctx);
        ver_ctx.insert("ver", ver);

        let mut paths = Accumulator::new(fmt, Layer::Path);
        let path_count = vg.paths.len();
        for (j, (path, pg)) in vg.paths.iter().enumerate() {
            let mut path_ctx = Context::new(sep);
            path_ctx.insert_prefixed("lvpath_", &path_fields(pg, sep));
            path_ctx.extend_from(&ver_ctx);
            path_ctx.insert("path", path);
            render_entry(fmt, Layer::Path, &mut path_ctx, Some(&mut paths))?;
            if j + 1 < path_count {
                paths.separate(fmt);
            }
        }
        paths.inject(&mut ver_ctx);

        render_entry(fmt, Layer::Version, &mut ver_ctx, Some(&mut versions))?;
        if i + 1 < version_count {
            versions.separate(fmt);
        }
    }
    versions.inject(&mut pkg_ctx);
    render_entry(fmt, Layer::Package, &mut pkg_ctx, None)
}

fn check_template(template: &Template, defined: &BTreeSet<String>) -> Result<(), TemplateError> {
    match template.fields().find(|field| !defined.contains(*field)) {
        Some(field) => Err(TemplateError::UndefinedField {
            template: template.name().to_string(),
            field: field.to_string(),
        }),
        None => Ok(()),
    }
}

/// What: Check a layer's fragments, guards and template against `defined`.
///
/// Details:
/// - Each fragment sees the fragments evaluated before it, in key order, and
///   is added to `defined` afterwards, as in [`render_entry`].
fn check_layer(
    fmt: &FormatSet,
    layer: Layer,
    defined: &mut BTreeSet<String>,
) -> Result<(), TemplateError> {
    for fragment in fmt.fragments(layer) {
        if let Some(guard) = &fragment.guard
            && !defined.contains(guard.field())
        {
            return Err(TemplateError::UndefinedField {
                template: fragment.key.clone(),
                field: guard.field().to_string(),
            });
        }
        check_template(&fragment.template, defined)?;
        defined.insert(fragment.key.clone());
    }
    check_template(fmt.layer(layer), defined)
}

/// What: Reject any template field no entry of its layer could define.
///
/// Inputs:
/// - `fmt`: Active format set.
/// - `query_ctx`: Fields from [`query_context`].
/// - `minimal`: Whether the result set skipped enrichment and preprocessing.
///
/// # Errors
/// - `TemplateError::UndefinedField` for the first unknown template or guard field.
///
/// Details:
/// - Field names come from the same builders the renderer uses, applied to
///   placeholder groups shaped like a minimal or full result set. Guards that
///   would reject and empty result sets are therefore checked as well.
fn check_fields(fmt: &FormatSet, query_ctx: &Context, minimal: bool) -> Result<(), TemplateError> {
    let sep = fmt.list_sep();
    let pkg = PackageGroup {
        enriched: !minimal,
        display: (!minimal).then(PackageDisplay::default),
        ..PackageGroup::default()
    };
    let vg = VersionGroup {
        display: (!minimal).then(VersionDisplay::default),
        ..VersionGroup::default()
    };
    let pg = PathGroup {
        display: (!minimal).then(PathDisplay::default),
        ..PathGroup::default()
    };

    let mut pkg_ctx = Context::new(sep);
    pkg_ctx.extend_from(query_ctx);
    package_fields(&mut pkg_ctx, &pkg);
    let mut package: BTreeSet<String> = pkg_ctx.keys().map(String::from).collect();
    package.insert("cp".to_string());

    let mut version: BTreeSet<String> = version_fields(&vg, sep)
        .keys()
        .map(|key| format!("lvver_{key}"))
        .collect();
    version.extend(package.iter().cloned());
    version.insert("ver".to_string());

    let mut path: BTreeSet<String> = path_fields(&pg, sep)
        .keys()
        .map(|key| format!("lvpath_{key}"))
        .collect();
    path.extend(version.iter().cloned());
    path.insert("path".to_string());

    check_layer(fmt, Layer::Path, &mut path)?;
    version.extend(Accumulator::keys(fmt, Layer::Path).map(String::from));
    check_layer(fmt, Layer::Version, &mut version)?;
    package.extend(Accumulator::keys(fmt, Layer::Version).map(String::from));
    check_layer(fmt, Layer::Package, &mut package)
}

/// What: Render the whole result set into one text blob.
///
/// Inputs:
/// - `results`: Sorted result set (enriched and preprocessed unless minimal).
/// - `fmt`: Active format set.
/// - `query_ctx`: Fields from [`query_context`].
/// - `minimal`: Whether `results` skipped enrichment and preprocessing.
///
/// Output:
/// - `Rendered` with the full text. Nothing is printed here, so a failing
///   field never leaves partial output behind.
///
/// # Errors
/// - The first `TemplateError::UndefinedField`, including guard fields.
///
/// Details:
/// - Every template field is checked against what its layer can define
///   before anything renders, so an unknown field fails even for an empty
///   result set or behind a guard that never passes.
/// - Paths render first; their accumulated `lvpath` and path fragments are
///   injected into the version context, versions likewise into the package
///   context. Package renderings are joined with `sep_lvcp`.
/// - An empty result set yields `noresult` and [`Outcome::NoResults`].
pub fn render(
    results: &ResultSet,
    fmt: &FormatSet,
    query_ctx: &Context,
    minimal: bool,
) -> Result<Rendered, TemplateError> {
    check_fields(fmt, query_ctx, minimal)?;
    if results.is_empty() {
        return Ok(Rendered {
            text: fmt.noresult().to_string(),
            outcome: Outcome::NoResults,
        });
    }
    let mut blocks = Vec::with_capacity(results.len());
    for (cp, pkg) in results.iter() {
        blocks.push(render_package(fmt, query_ctx, cp, pkg)?);
    }
    tracing::debug!(packages = blocks.len(), set = %fmt.name(), "report rendered");
    Ok(Rendered {
        text: blocks.join(fmt.separator(Layer::Package.key())),
        outcome: Outcome::Matched,
    })
}
