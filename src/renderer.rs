use crate::context::{ContextRef, Numeric};
use crate::error::Error;
use crate::parser::{expand_newlines, Index, Node, Op};

/// Walks the node sequence and concatenates each node's output chunk
/// in order.
///
/// Binding resolution is deferred to this point: a missing name, a
/// failed accessor, or a non-numeric arithmetic operand aborts the
/// whole render with no partial output.
pub fn render(nodes: &[Node], context: ContextRef) -> Result<String, Error> {
    let chunks = nodes
        .iter()
        .map(|node| emit(node, context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(chunks.concat())
}

fn emit(node: &Node, context: ContextRef) -> Result<String, Error> {
    match node {
        Node::Root | Node::Skip => Ok(String::new()),
        Node::Data(text) => Ok(expand_newlines(text)),
        Node::Name(name) => Ok(lookup(context, name)?.value()),
        Node::Get(name, index) => Ok(access(context, name, index)?.value()),
        Node::Const(n) => Ok(n.to_string()),
        Node::Calc { .. } => Ok(calculate(node, context)?.to_string()),
        Node::If { test, body } => {
            if lookup(context, test)?.is_truthy() {
                Ok(expand_newlines(body))
            } else {
                Ok(String::new())
            }
        }
    }
}

fn lookup<'a>(context: ContextRef<'a>, name: &str) -> Result<ContextRef<'a>, Error> {
    context
        .child(name)
        .ok_or_else(|| Error::Undefined(name.to_owned()))
}

fn access<'a>(
    context: ContextRef<'a>,
    name: &str,
    index: &Index,
) -> Result<ContextRef<'a>, Error> {
    let base = lookup(context, name)?;
    match index {
        Index::Item(i) => base.item(*i).ok_or_else(|| Error::OutOfRange {
            name: name.to_owned(),
            index: *i,
        }),
        Index::Key(key) => base.child(key).ok_or_else(|| Error::MissingKey {
            name: name.to_owned(),
            key: key.clone(),
        }),
    }
}

fn calculate(node: &Node, context: ContextRef) -> Result<Numeric, Error> {
    match node {
        Node::Const(n) => Ok(Numeric::Int(*n)),
        Node::Name(name) => numeric(lookup(context, name)?, name),
        Node::Get(name, index) => numeric(access(context, name, index)?, &describe(name, index)),
        Node::Calc { op, left, right } => {
            let left = calculate(left, context)?;
            let right = calculate(right, context)?;
            apply(*op, left, right)
        }
        _ => Err(Error::Parse("invalid arithmetic operand".to_owned())),
    }
}

fn numeric(context: ContextRef, described: &str) -> Result<Numeric, Error> {
    context
        .number()
        .ok_or_else(|| Error::NotANumber(described.to_owned()))
}

fn describe(name: &str, index: &Index) -> String {
    match index {
        Index::Item(i) => format!("{}[{}]", name, i),
        Index::Key(key) => format!("{}['{}']", name, key),
    }
}

/// Integer operands stay integral except under division, which always
/// yields a float; any float operand promotes the result.
fn apply(op: Op, left: Numeric, right: Numeric) -> Result<Numeric, Error> {
    use Numeric::{Float, Int};
    if matches!(op, Op::Div | Op::Mod) && right.is_zero() {
        return Err(Error::DivisionByZero);
    }
    let value = match (op, left, right) {
        (Op::Div, a, b) => Float(a.to_f64() / b.to_f64()),
        (Op::Add, Int(a), Int(b)) => Int(a + b),
        (Op::Sub, Int(a), Int(b)) => Int(a - b),
        (Op::Mul, Int(a), Int(b)) => Int(a * b),
        (Op::Mod, Int(a), Int(b)) => Int(a % b),
        (Op::Add, a, b) => Float(a.to_f64() + b.to_f64()),
        (Op::Sub, a, b) => Float(a.to_f64() - b.to_f64()),
        (Op::Mul, a, b) => Float(a.to_f64() * b.to_f64()),
        (Op::Mod, a, b) => Float(a.to_f64() % b.to_f64()),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_is_always_fractional() {
        let result = apply(Op::Div, Numeric::Int(4), Numeric::Int(2)).unwrap();
        assert_eq!(result, Numeric::Float(2.0));
        assert_eq!(result.to_string(), "2.0");
    }

    #[test]
    fn integer_ops_stay_integral() {
        assert_eq!(
            apply(Op::Add, Numeric::Int(1), Numeric::Int(2)).unwrap(),
            Numeric::Int(3)
        );
        assert_eq!(
            apply(Op::Mod, Numeric::Int(5), Numeric::Int(2)).unwrap(),
            Numeric::Int(1)
        );
    }

    #[test]
    fn float_operand_promotes() {
        assert_eq!(
            apply(Op::Add, Numeric::Float(0.5), Numeric::Int(1)).unwrap(),
            Numeric::Float(1.5)
        );
    }

    #[test]
    fn division_by_zero_fails() {
        assert!(matches!(
            apply(Op::Div, Numeric::Int(1), Numeric::Int(0)),
            Err(Error::DivisionByZero)
        ));
        assert!(matches!(
            apply(Op::Mod, Numeric::Int(1), Numeric::Int(0)),
            Err(Error::DivisionByZero)
        ));
    }
}
