use ccs_field::Field;

use crate::coeff::{CoeffTable, COEFF_MINUS_ONE, COEFF_ONE};
use crate::term::{Term, TERM_DELIMITER};
use crate::visibility::Visibility;

/// `{ format, to_resolve }`: a debug-info entry recorded verbatim by the
/// builder and rendered lazily, only when a constraint it's attached to
/// turns out to be unsatisfied.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub format: String,
    pub to_resolve: Vec<Term>,
}

impl LogEntry {
    pub fn new(format: impl Into<String>, to_resolve: Vec<Term>) -> Self {
        LogEntry {
            format: format.into(),
            to_resolve,
        }
    }

    /// Renders this entry against a solver's current state.
    ///
    /// Walks `to_resolve`; [`TERM_DELIMITER`] toggles "evaluation" mode, in
    /// which consecutive terms are summed into one accumulator and rendered
    /// as a single argument, rather than one argument per term.
    pub fn render<F: Field>(&self, coeffs: &CoeffTable<F>, values: &[Option<F>]) -> String {
        let mut args = Vec::new();
        let mut eval_mode = false;
        let mut acc: Option<F> = None;
        let mut acc_unsolved = false;

        for &t in &self.to_resolve {
            if t.is_delimiter() {
                if eval_mode {
                    args.push(flush_accumulator(acc, acc_unsolved));
                    acc = None;
                    acc_unsolved = false;
                }
                eval_mode = !eval_mode;
                continue;
            }

            if eval_mode {
                let (term_value, unsolved) = term_value(coeffs, values, t);
                if unsolved {
                    acc_unsolved = true;
                } else {
                    acc = Some(acc.map_or(term_value, |a| a + term_value));
                }
            } else {
                args.push(render_single_term(coeffs, values, t));
            }
        }
        if eval_mode {
            args.push(flush_accumulator(acc, acc_unsolved));
        }

        substitute(&self.format, &args)
    }
}

fn term_value<F: Field>(coeffs: &CoeffTable<F>, values: &[Option<F>], t: Term) -> (F, bool) {
    if t.visibility() == Visibility::Virtual {
        return (coeffs.get(t.coeff_id()), false);
    }
    match values.get(t.wire_id() as usize).copied().flatten() {
        Some(v) => (coeffs.get(t.coeff_id()) * v, false),
        None => (F::ZERO, true),
    }
}

fn flush_accumulator<F: Field>(acc: Option<F>, unsolved: bool) -> String {
    if unsolved {
        return "<unsolved>".to_string();
    }
    format!("{}", acc.unwrap_or(F::ZERO))
}

fn render_single_term<F: Field>(coeffs: &CoeffTable<F>, values: &[Option<F>], t: Term) -> String {
    if t.visibility() == Visibility::Virtual {
        return format!("{}", coeffs.get(t.coeff_id()));
    }
    let Some(Some(value)) = values.get(t.wire_id() as usize) else {
        return "<unsolved>".to_string();
    };
    match t.coeff_id() {
        COEFF_ONE => format!("{value}"),
        COEFF_MINUS_ONE => format!("-{value}"),
        _ => format!("{}*{value}", coeffs.get(t.coeff_id())),
    }
}

/// Substitutes each element of `args`, in order, for a `{}` placeholder in `format`.
fn substitute(format: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut arg_iter = args.iter();
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'}') {
            chars.next();
            if let Some(arg) = arg_iter.next() {
                out.push_str(arg);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccs_field::Fr;
    use crate::coeff::COEFF_ONE;

    #[test]
    fn renders_plain_terms() {
        let coeffs: CoeffTable<Fr> = CoeffTable::new();
        let t0 = Term::pack(COEFF_ONE, 0, Visibility::Public);
        let log = LogEntry::new("x = {}", vec![t0]);
        let values = vec![Some(Fr::from_canonical_u64(42))];
        assert_eq!(log.render(&coeffs, &values), "x = 42");
    }

    #[test]
    fn renders_unsolved_wire() {
        let coeffs: CoeffTable<Fr> = CoeffTable::new();
        let t0 = Term::pack(COEFF_ONE, 0, Visibility::Internal);
        let log = LogEntry::new("x = {}", vec![t0]);
        let values: Vec<Option<Fr>> = vec![None];
        assert_eq!(log.render(&coeffs, &values), "x = <unsolved>");
    }

    #[test]
    fn eval_mode_sums_until_delimiter() {
        let coeffs: CoeffTable<Fr> = CoeffTable::new();
        let t0 = Term::pack(COEFF_ONE, 0, Visibility::Public);
        let t1 = Term::pack(COEFF_ONE, 1, Visibility::Public);
        let log = LogEntry::new(
            "sum = {}",
            vec![TERM_DELIMITER, t0, t1, TERM_DELIMITER],
        );
        let values = vec![Some(Fr::from_canonical_u64(2)), Some(Fr::from_canonical_u64(3))];
        assert_eq!(log.render(&coeffs, &values), "sum = 5");
    }
}
