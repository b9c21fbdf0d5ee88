//! Conditional resolver.
//!
//! Decides, once per conditional block and at parse time, which branch's
//! declarations propagate into the enclosing scope. Branch conditions are
//! evaluated left to right against the target version; the first true
//! condition — or the trailing `else` — wins and every other branch is
//! discarded in full. With no match and no `else`, the block contributes
//! nothing.
//!
//! Condition operands are validated when the condition is built, so
//! resolution itself cannot fail.

use stencil_ir::{CondBranch, Condition, ConditionalBlock, Decl, Version};

/// Resolve a conditional block to the declarations of its winning branch.
pub fn resolve(block: ConditionalBlock, target: &Version) -> Vec<Decl> {
    match select_branch(&block.branches, target) {
        Some(index) => block
            .branches
            .into_iter()
            .nth(index)
            .map(|branch| branch.body)
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Index of the first branch whose condition holds, or of the trailing
/// `else` branch; `None` when nothing matches.
pub(crate) fn select_branch(branches: &[CondBranch], target: &Version) -> Option<usize> {
    for (index, branch) in branches.iter().enumerate() {
        match &branch.condition {
            None => return Some(index),
            Some(condition) if evaluate(condition, target) => return Some(index),
            Some(_) => {}
        }
    }
    None
}

/// Evaluate one version guard against the target.
fn evaluate(condition: &Condition, target: &Version) -> bool {
    condition.op.evaluate(target.compare(&condition.right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stencil_ir::{CmpOp, Name, Span};

    fn guard(op: CmpOp, right: &[u32]) -> Option<Condition> {
        Some(Condition {
            left: Name::from_raw(1),
            op,
            right: Version::from(right),
            span: Span::DUMMY,
        })
    }

    fn branch(condition: Option<Condition>) -> CondBranch {
        CondBranch {
            condition,
            body: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[test]
    fn test_first_true_wins() {
        let branches = vec![
            branch(guard(CmpOp::Ge, &[3, 0])),
            branch(guard(CmpOp::Ge, &[2, 0])),
        ];
        assert_eq!(select_branch(&branches, &Version::from([3, 8])), Some(0));
        assert_eq!(select_branch(&branches, &Version::from([2, 7])), Some(1));
    }

    #[test]
    fn test_else_catches_all() {
        let branches = vec![branch(guard(CmpOp::Lt, &[3])), branch(None)];
        assert_eq!(select_branch(&branches, &Version::from([3, 8])), Some(1));
    }

    #[test]
    fn test_no_match_no_else() {
        let branches = vec![branch(guard(CmpOp::Lt, &[3]))];
        assert_eq!(select_branch(&branches, &Version::from([3, 8])), None);
    }

    #[test]
    fn test_zero_padded_comparison() {
        // (3,) == (3, 0) == (3, 0, 0)
        let branches = vec![branch(guard(CmpOp::Eq, &[3, 0, 0]))];
        assert_eq!(select_branch(&branches, &Version::from([3])), Some(0));
    }
}
