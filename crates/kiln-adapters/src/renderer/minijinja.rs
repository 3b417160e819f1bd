//! [`TemplateRenderer`] backed by minijinja.
//!
//! Templates see their builder's [`Template::render_context`] as globals and
//! every [`FuncMap`] entry both as a function (`{{ title(kind) }}`) and as a
//! filter (`{{ kind | title }}`). Undefined variables are errors.
//!
//! Custom [`Delimiters`] replace the expression delimiters only; block
//! (`{% %}`) and comment (`{# #}`) syntax is unchanged.

use std::path::Path;

use minijinja::{AutoEscape, Environment, UndefinedBehavior, syntax::SyntaxConfig};
use tracing::{instrument, trace};

use kiln_core::{
    application::{ScaffoldError, ports::TemplateRenderer},
    domain::{Delimiters, FuncMap, Template, TemplateFunction},
    error::KilnResult,
};

/// Renders template bodies with minijinja.
#[derive(Debug, Clone)]
pub struct MiniJinjaRenderer {
    funcs: FuncMap,
}

impl MiniJinjaRenderer {
    /// Renderer whose templates see `funcs` unless they bring their own map.
    pub fn new(funcs: FuncMap) -> Self {
        Self { funcs }
    }

    fn environment(
        funcs: &FuncMap,
        delimiters: Option<&Delimiters>,
    ) -> Result<Environment<'static>, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        if let Some(d) = delimiters {
            let syntax = SyntaxConfig::builder()
                .variable_delimiters(d.left.clone(), d.right.clone())
                .build()?;
            env.set_syntax(syntax);
        }

        for (name, func) in funcs.iter() {
            match func {
                TemplateFunction::Transform(f) => {
                    let (as_fn, as_filter) = (f.clone(), f.clone());
                    env.add_function(name.to_string(), move |s: &str| as_fn(s));
                    env.add_filter(name.to_string(), move |s: &str| as_filter(s));
                }
                TemplateFunction::Predicate(f) => {
                    let (as_fn, as_filter) = (f.clone(), f.clone());
                    env.add_function(name.to_string(), move |s: &str| as_fn(s));
                    env.add_filter(name.to_string(), move |s: &str| as_filter(s));
                }
            }
        }
        Ok(env)
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new(FuncMap::standard())
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn render(&self, path: &Path, template: &dyn Template) -> KilnResult<String> {
        let funcs = template.func_map().unwrap_or(&self.funcs);
        let render_error = |e: minijinja::Error| ScaffoldError::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let env = Self::environment(funcs, template.delimiters()).map_err(render_error)?;
        let name = path.display().to_string();
        let output = env
            .render_named_str(&name, template.body(), template.render_context())
            .map_err(render_error)?;

        trace!(bytes = output.len(), "rendered template");
        Ok(output)
    }
}
