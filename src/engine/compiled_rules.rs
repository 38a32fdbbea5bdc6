//! Rule compilation and indexing.
//!
//! Rules arrive with string references (`"chuva"`, `"baixa"`). Compiling them
//! resolves every reference to a `(variable index, term index)` pair once, so
//! that:
//!
//! - a rule naming an undeclared variable or term is rejected at
//!   construction, never discovered halfway through an inference;
//! - firing a rule during `compute` is pure index arithmetic.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `CompiledRules::rules`, which is aligned with
//!   the engine's source `Rule` list.
//! - Antecedent leaves only point at `Role::Antecedent` variables; consequents
//!   only at `Role::Consequent` variables.
//! - `RuleIndex::by_consequent` is indexed by variable index and is empty for
//!   antecedent variables.

use crate::error::ConfigError;
use crate::variable::{LinguisticVariable, Role};
use crate::{Antecedent, Rule};

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

/// Antecedent tree with names resolved to indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CompiledAntecedent {
    Leaf { variable: usize, term: usize },
    And(Box<CompiledAntecedent>, Box<CompiledAntecedent>),
    Or(Box<CompiledAntecedent>, Box<CompiledAntecedent>),
}

impl CompiledAntecedent {
    /// Firing strength against per-variable, per-term degrees.
    ///
    /// Both sides of every node are always evaluated: min/max have no
    /// short-circuit in fuzzy logic.
    pub(crate) fn fire(&self, degrees: &[Vec<f64>]) -> f64 {
        match self {
            CompiledAntecedent::Leaf { variable, term } => degrees[*variable][*term],
            CompiledAntecedent::And(l, r) => {
                let (l, r) = (l.fire(degrees), r.fire(degrees));
                l.min(r)
            }
            CompiledAntecedent::Or(l, r) => {
                let (l, r) = (l.fire(degrees), r.fire(degrees));
                l.max(r)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub antecedent: CompiledAntecedent,
    pub output: usize,
    pub term: usize,
}

#[derive(Default, Debug)]
pub(crate) struct RuleIndex {
    pub by_consequent: Vec<Vec<RuleId>>,
}

/// Resolved rule set plus the consequent index.
#[derive(Debug)]
pub(crate) struct CompiledRules {
    pub rules: Vec<CompiledRule>,
    pub index: RuleIndex,
}

impl CompiledRules {
    pub(crate) fn new(variables: &[LinguisticVariable], rules: &[Rule]) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }

        let mut index = RuleIndex { by_consequent: vec![Vec::new(); variables.len()] };
        let mut compiled = Vec::with_capacity(rules.len());

        for (id, rule) in rules.iter().enumerate() {
            let antecedent = compile_antecedent(variables, &rule.name, &rule.when)?;

            let (output, term) = resolve(variables, &rule.name, &rule.then.variable, &rule.then.term)?;
            if variables[output].role() != Role::Consequent {
                return Err(ConfigError::NotAConsequent {
                    rule: rule.name.clone(),
                    variable: rule.then.variable.clone(),
                });
            }

            index.by_consequent[output].push(id);
            compiled.push(CompiledRule { antecedent, output, term });
        }

        Ok(CompiledRules { rules: compiled, index })
    }
}

fn compile_antecedent(
    variables: &[LinguisticVariable],
    rule: &str,
    node: &Antecedent,
) -> Result<CompiledAntecedent, ConfigError> {
    Ok(match node {
        Antecedent::Is { variable, term } => {
            let (v, t) = resolve(variables, rule, variable, term)?;
            if variables[v].role() != Role::Antecedent {
                return Err(ConfigError::NotAnAntecedent { rule: rule.to_string(), variable: variable.clone() });
            }
            CompiledAntecedent::Leaf { variable: v, term: t }
        }
        Antecedent::And(l, r) => CompiledAntecedent::And(
            Box::new(compile_antecedent(variables, rule, l)?),
            Box::new(compile_antecedent(variables, rule, r)?),
        ),
        Antecedent::Or(l, r) => CompiledAntecedent::Or(
            Box::new(compile_antecedent(variables, rule, l)?),
            Box::new(compile_antecedent(variables, rule, r)?),
        ),
    })
}

fn resolve(
    variables: &[LinguisticVariable],
    rule: &str,
    variable: &str,
    term: &str,
) -> Result<(usize, usize), ConfigError> {
    let v = variables.iter().position(|v| v.name() == variable).ok_or_else(|| ConfigError::UnknownVariable {
        rule: rule.to_string(),
        variable: variable.to_string(),
    })?;
    let t = variables[v].term_index(term).ok_or_else(|| ConfigError::UnknownTerm {
        rule: rule.to_string(),
        variable: variable.to_string(),
        term: term.to_string(),
    })?;
    Ok((v, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::Triangle;
    use crate::variable::Universe;
    use crate::{Antecedent, Consequent};

    fn variables() -> Vec<LinguisticVariable> {
        let u = Universe::new(0.0, 10.0, 1.0).unwrap();
        let t = Triangle::new(0.0, 5.0, 10.0).unwrap();
        vec![
            LinguisticVariable::antecedent("x", u.clone())
                .unwrap()
                .with_term("lo", t)
                .unwrap()
                .with_term("hi", t)
                .unwrap(),
            LinguisticVariable::antecedent("y", u.clone()).unwrap().with_term("lo", t).unwrap(),
            LinguisticVariable::consequent("z", u).unwrap().with_term("mid", t).unwrap(),
        ]
    }

    fn leaf(variable: usize, term: usize) -> CompiledAntecedent {
        CompiledAntecedent::Leaf { variable, term }
    }

    #[test]
    fn and_is_min_or_is_max() {
        // x: lo=0.3 hi=0.9, y: lo=0.6
        let degrees = vec![vec![0.3, 0.9], vec![0.6], vec![]];
        let p = leaf(0, 0);
        let q = leaf(1, 0);
        let and = CompiledAntecedent::And(Box::new(p.clone()), Box::new(q.clone()));
        let or = CompiledAntecedent::Or(Box::new(p), Box::new(q));
        assert_eq!(and.fire(&degrees), 0.3);
        assert_eq!(or.fire(&degrees), 0.6);

        let nested = CompiledAntecedent::Or(Box::new(and), Box::new(leaf(0, 1)));
        assert_eq!(nested.fire(&degrees), 0.9);
    }

    #[test]
    fn resolves_names_and_indexes_consequents() {
        let rules = vec![
            Rule::new("r0", Antecedent::is("x", "hi") & Antecedent::is("y", "lo"), Consequent::new("z", "mid")),
            Rule::new("r1", Antecedent::is("x", "lo"), Consequent::new("z", "mid")),
        ];
        let compiled = CompiledRules::new(&variables(), &rules).unwrap();
        assert_eq!(
            compiled.rules[0].antecedent,
            CompiledAntecedent::And(Box::new(leaf(0, 1)), Box::new(leaf(1, 0)))
        );
        assert_eq!(compiled.index.by_consequent, vec![vec![], vec![], vec![0, 1]]);
    }

    #[test]
    fn rejects_bad_references() {
        let vars = variables();
        let check = |when: Antecedent, then: Consequent| {
            CompiledRules::new(&vars, &[Rule::new("bad", when, then)]).unwrap_err()
        };

        assert!(matches!(
            check(Antecedent::is("w", "lo"), Consequent::new("z", "mid")),
            ConfigError::UnknownVariable { .. }
        ));
        assert!(matches!(
            check(Antecedent::is("y", "hi"), Consequent::new("z", "mid")),
            ConfigError::UnknownTerm { .. }
        ));
        assert!(matches!(
            check(Antecedent::is("x", "lo"), Consequent::new("z", "high")),
            ConfigError::UnknownTerm { .. }
        ));
        assert!(matches!(
            check(Antecedent::is("z", "mid"), Consequent::new("z", "mid")),
            ConfigError::NotAnAntecedent { .. }
        ));
        assert!(matches!(
            check(Antecedent::is("x", "lo"), Consequent::new("y", "lo")),
            ConfigError::NotAConsequent { .. }
        ));
        assert!(matches!(CompiledRules::new(&vars, &[]), Err(ConfigError::EmptyRuleSet)));
    }
}
