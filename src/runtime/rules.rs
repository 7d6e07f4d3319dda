//! Rule set: the lookup tables every solver consults
//!
//! - Variable-Definition Table (Variables section, `name → logic`)
//! - Macro Table (`name → aggregate expression`)
//! - Parameter map (`name → number`)
//! - Kind index built from the scanner's classification of every reference

use std::collections::{BTreeMap, HashMap};

use super::evaluator::evaluate;
use super::value::Assignment;
use crate::ast::{Classifier, NamingConvention, Node, RuleDocument, VarKind};
use crate::error::{Error, Result};
use crate::logic::{decompose_additive, Polarity};
use crate::options::GeneratorOptions;
use crate::params::Parameters;

/// Immutable context shared by every solver invocation
#[derive(Debug, Clone)]
pub struct RuleSet {
    document: RuleDocument,
    definitions: HashMap<String, Node>,
    macros: BTreeMap<String, Node>,
    parameters: Assignment,
    kinds: HashMap<String, VarKind>,
    classifier: Classifier,
}

impl RuleSet {
    /// Build a rule set with the default naming convention
    pub fn new(
        document: RuleDocument,
        macros: BTreeMap<String, Node>,
        parameters: Parameters,
    ) -> Result<Self> {
        Self::with_naming(document, macros, parameters, &NamingConvention::default())
    }

    /// Build a rule set classified by the naming convention of `options`
    pub fn with_options(
        document: RuleDocument,
        macros: BTreeMap<String, Node>,
        parameters: Parameters,
        options: &GeneratorOptions,
    ) -> Result<Self> {
        Self::with_naming(document, macros, parameters, &options.naming)
    }

    /// Build a rule set with a custom naming convention
    pub fn with_naming(
        document: RuleDocument,
        macros: BTreeMap<String, Node>,
        parameters: Parameters,
        naming: &NamingConvention,
    ) -> Result<Self> {
        let classifier = naming.compile()?;

        let mut definitions = HashMap::new();
        for def in &document.variables {
            if def.target.trim().is_empty() {
                return Err(Error::document("variable with an empty target name"));
            }
            if macros.contains_key(&def.target) {
                return Err(Error::document(format!(
                    "{} is declared both as a macro and as a variable",
                    def.target
                )));
            }
            if definitions
                .insert(def.target.clone(), def.logic.clone())
                .is_some()
            {
                tracing::warn!("Variable {} is defined more than once; last definition wins", def.target);
            }
        }

        let parameters = parameters.into_values();
        let kinds = index_kinds(&document, &macros, &definitions, &parameters);

        Ok(Self {
            document,
            definitions,
            macros,
            parameters,
            kinds,
            classifier,
        })
    }

    /// The rule document
    pub fn document(&self) -> &RuleDocument {
        &self.document
    }

    /// Parameter map
    pub fn parameters(&self) -> &Assignment {
        &self.parameters
    }

    /// True if `name` is a loaded parameter
    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Definition of a derived variable
    pub fn definition(&self, name: &str) -> Option<&Node> {
        self.definitions.get(name)
    }

    /// Expression of a macro
    pub fn macro_expr(&self, name: &str) -> Option<&Node> {
        self.macros.get(name)
    }

    /// True if `name` is a macro
    pub fn is_macro(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Defining expression of a derived variable or a macro
    pub fn defining_node(&self, name: &str) -> Option<&Node> {
        self.definitions.get(name).or_else(|| self.macros.get(name))
    }

    /// Kind of a name: table membership first, then the scanner's
    /// classification, then the naming convention
    pub fn kind_of(&self, name: &str) -> VarKind {
        self.kinds
            .get(name)
            .copied()
            .unwrap_or_else(|| self.classifier.classify(name))
    }

    /// True if `name` may appear in an emitted test case
    pub fn is_input(&self, name: &str) -> bool {
        self.kind_of(name).is_input()
    }

    /// First input leaf of a macro, used as its delegate
    pub fn macro_delegate(&self, name: &str) -> Option<&str> {
        self.macros
            .get(name)?
            .leaf_vars()
            .into_iter()
            .find(|leaf| self.is_input(leaf))
    }

    /// `assignment ∪ parameters`, parameters taking precedence
    pub fn with_parameters(&self, assignment: &Assignment) -> Assignment {
        let mut ctx = assignment.clone();
        ctx.extend(self.parameters.iter().map(|(k, v)| (k.clone(), *v)));
        ctx
    }

    /// Remove parameter keys from a working assignment
    pub fn strip_parameters(&self, mut assignment: Assignment) -> Assignment {
        assignment.retain(|k, _| !self.is_parameter(k));
        assignment
    }

    /// Externally visible view: input kinds only, zeros and parameters dropped
    pub fn emittable(&self, assignment: &Assignment) -> Assignment {
        assignment
            .iter()
            .filter(|(k, v)| **v != 0.0 && !self.is_parameter(k) && self.is_input(k))
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Context an emitted case reproduces: its visible inputs and the
    /// parameters, with every macro and variable recalculated from them
    pub fn replay(&self, inputs: &Assignment) -> Assignment {
        let mut context = self.with_parameters(&self.emittable(inputs));
        self.complete_context(&mut context, None);
        context
    }

    /// Evaluate the Variables section in declaration order, each result
    /// visible to the following ones. Unbound macros are computed first.
    /// Returns only the variable values.
    pub fn calculate_variables(&self, context: &Assignment) -> Assignment {
        let mut current = context.clone();
        for (name, expr) in &self.macros {
            if !current.contains_key(name) {
                let value = evaluate(expr, &current);
                current.insert(name.clone(), value);
            }
        }
        let mut results = Assignment::new();
        for def in &self.document.variables {
            let value = evaluate(&def.logic, &current);
            results.insert(def.target.clone(), value);
            current.insert(def.target.clone(), value);
        }
        results
    }

    /// Calculate every macro and then, in declaration order, every variable
    /// not already bound in `context` (bound values are pinned intents and
    /// are kept)
    pub fn complete_context(&self, context: &mut Assignment, skip: Option<&str>) {
        for (name, expr) in &self.macros {
            if skip == Some(name.as_str()) || context.contains_key(name) {
                continue;
            }
            let value = evaluate(expr, context);
            context.insert(name.clone(), value);
        }
        for def in &self.document.variables {
            if skip == Some(def.target.as_str()) || context.contains_key(&def.target) {
                continue;
            }
            let value = evaluate(&def.logic, context);
            context.insert(def.target.clone(), value);
        }
    }

    /// Leaf roots of `node`, chasing derived variables and macros through
    /// their definitions. Order of first appearance, no duplicates.
    pub fn roots(&self, node: &Node, max_depth: usize) -> Result<Vec<String>> {
        let mut roots = Vec::new();
        self.collect_roots(node, 0, max_depth, &mut roots)?;
        Ok(roots)
    }

    /// Roots of a list of atoms: derived atoms and macros resolve through
    /// their definition, input atoms are their own root, anything else is
    /// dropped
    pub fn resolve_roots(&self, atoms: &[String], max_depth: usize) -> Result<Vec<String>> {
        let mut roots: Vec<String> = Vec::new();
        for atom in atoms {
            let resolved = match self.defining_node(atom) {
                Some(def) => self.roots(def, max_depth)?,
                None if self.is_input(atom) => vec![atom.clone()],
                None => Vec::new(),
            };
            for r in resolved {
                if !roots.contains(&r) {
                    roots.push(r);
                }
            }
        }
        Ok(roots)
    }

    /// Additive polarity of `node` with derived variables and macros
    /// replaced by their definitions, signs carried through. An atom whose
    /// definition is not additive is kept as it is.
    pub fn expand_polarity(&self, node: &Node, max_depth: usize) -> Result<Polarity> {
        let mut out = Polarity::default();
        self.expand_into(decompose_additive(node), true, 0, max_depth, &mut out)?;
        Ok(out)
    }

    fn expand_into(
        &self,
        polarity: Polarity,
        positive: bool,
        depth: usize,
        max_depth: usize,
        out: &mut Polarity,
    ) -> Result<()> {
        let sides = [(polarity.positive, positive), (polarity.negative, !positive)];
        for (atoms, sign) in sides {
            for atom in atoms {
                let inner = self
                    .defining_node(&atom)
                    .map(decompose_additive)
                    .filter(|p| !p.is_empty());
                match inner {
                    Some(inner) => {
                        if depth >= max_depth {
                            return Err(Error::cycle(atom, depth));
                        }
                        self.expand_into(inner, sign, depth + 1, max_depth, out)?;
                    }
                    None if sign => out.positive.push(atom),
                    None => out.negative.push(atom),
                }
            }
        }
        Ok(())
    }

    fn collect_roots(
        &self,
        node: &Node,
        depth: usize,
        max_depth: usize,
        roots: &mut Vec<String>,
    ) -> Result<()> {
        for leaf in node.leaf_vars() {
            match self.defining_node(leaf) {
                Some(def) => {
                    if depth >= max_depth {
                        return Err(Error::cycle(leaf, depth));
                    }
                    self.collect_roots(def, depth + 1, max_depth, roots)?;
                }
                None => {
                    if !roots.iter().any(|r| r == leaf) {
                        roots.push(leaf.to_string());
                    }
                }
            }
        }
        Ok(())
    }
}

fn index_kinds(
    document: &RuleDocument,
    macros: &BTreeMap<String, Node>,
    definitions: &HashMap<String, Node>,
    parameters: &Assignment,
) -> HashMap<String, VarKind> {
    let mut kinds = HashMap::new();
    let mut record = |node: &Node| {
        for (name, kind) in node.leaf_refs() {
            kinds.entry(name.to_string()).or_insert(kind);
        }
    };

    record(&document.entry_condition);
    for def in &document.variables {
        record(&def.logic);
    }
    for item in &document.norm_observation {
        match item {
            crate::ast::NormItem::Condition(node) => record(node),
            crate::ast::NormItem::Calculation(def) => record(&def.logic),
        }
    }
    for expr in macros.values() {
        record(expr);
    }

    for name in definitions.keys() {
        kinds.insert(name.clone(), VarKind::Derived);
    }
    for name in macros.keys() {
        kinds.insert(name.clone(), VarKind::Macro);
    }
    for name in parameters.keys() {
        kinds.insert(name.clone(), VarKind::Parameter);
    }
    kinds
}
