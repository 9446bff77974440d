use std::fmt;

use app_registry::{
    py_value::repr_str, BaseRef, ClassTable, ExtractorClass, MemberSource, RootBase,
    SelfHostedFields,
};

use crate::{error::OrderError, ordering::order_classes};

/// Name of the list the generated module exposes its classes under.
pub const ALL_CLASSES: &str = "_ALL_CLASSES";

/// A generated class definition carrying just enough to match URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandIn<'a> {
    pub name: &'a str,
    pub bases: Vec<&'a str>,
    pub module: &'a str,
    pub valid_url: Option<String>,
    pub working: bool,
    pub suitable: Option<&'a MemberSource>,
    pub self_hosted_fields: Option<&'a SelfHostedFields>,
}
impl<'a> StandIn<'a> {
    #[must_use]
    pub fn from_class(table: &ClassTable, class: &'a ExtractorClass) -> Self {
        let self_hosted_fields = Some(&class.self_hosted_fields)
            .filter(|x| !x.is_empty() && table.is_self_hosted(class));

        Self {
            name: &class.name,
            bases: class.bases.iter().map(BaseRef::stand_in_name).collect(),
            module: &class.module,
            valid_url: class.effective_valid_url(),
            working: class.working,
            suitable: class.suitable_override.as_ref(),
            self_hosted_fields,
        }
    }
}
impl fmt::Display for StandIn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "class {}({}):", self.name, self.bases.join(", "))?;
        writeln!(f, "    _module = {}", repr_str(self.module))?;

        if let Some(valid_url) = &self.valid_url {
            writeln!(f, "    _VALID_URL = {}", repr_str(valid_url))?;
        }

        if !self.working {
            writeln!(f, "    _WORKING = False")?;
        }

        if let Some(suitable) = self.suitable {
            writeln!(f)?;
            f.write_str(&suitable.in_class_body())?;
        }

        for (field, value) in self.self_hosted_fields.into_iter().flatten() {
            writeln!(f, "    {} = {value}", field.attribute())?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RenderedModule {
    pub source: String,
    /// Concrete class names in emission order, as listed in `_ALL_CLASSES`.
    pub listed: Vec<String>,
    /// Number of stand-ins emitted, helper bases included.
    pub emitted: usize,
}

/// Order the classes of `table` and render the whole lazy module.
pub fn render_module(template: &str, table: &ClassTable) -> Result<RenderedModule, OrderError> {
    let ordered = order_classes(table)?;

    Ok(RenderedModule {
        source: render(template, table, &ordered),
        listed: ordered
            .iter()
            .filter(|c| c.concrete)
            .map(|c| c.name.clone())
            .collect(),
        emitted: ordered.len(),
    })
}

/// Render the lazy module for classes already in emission order.
#[must_use]
pub fn render(template: &str, table: &ClassTable, ordered: &[&ExtractorClass]) -> String {
    let roots = table.roots();
    let info = RootBase::Info.stand_in_name();

    let mut parts = vec![template.to_string()];
    parts.extend(roots.info_members().map(|m| m.source.in_class_body()));
    parts.push(format!(
        "\nclass {}({info}):\n    pass\n",
        RootBase::Search.stand_in_name()
    ));
    parts.push(format!(
        "\nclass {}({info}):",
        RootBase::SelfHosted.stand_in_name()
    ));
    parts.push("    _SELF_HOSTED = True\n".to_string());
    parts.extend(roots.self_hosted_members().map(|m| m.source.in_class_body()));
    parts.extend(
        roots
            .self_hosted
            .fields
            .iter()
            .map(|(field, value)| format!("    {} = {value}", field.attribute())),
    );
    parts.push(String::new());

    parts.extend(
        ordered
            .iter()
            .map(|c| StandIn::from_class(table, c).to_string()),
    );

    let names = ordered
        .iter()
        .filter(|c| c.concrete)
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>();
    parts.push(format!("\n{ALL_CLASSES} = [{}]", names.join(", ")));

    let mut out = parts.join("\n");
    out.push('\n');

    out
}
