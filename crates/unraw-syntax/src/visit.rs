//! Interruptible pre-order traversal over Tree-sitter nodes.

use std::ops::ControlFlow;

use crate::error::Interrupted;

/// Visits `root` and every descendant in pre-order.
///
/// `cancelled` is polled before each node; once it returns `true` the walk
/// stops and [`Interrupted`] is returned. A cursor created from `root` never
/// leaves the subtree rooted there.
pub(crate) fn walk_preorder<'tree, C, F>(
    root: tree_sitter::Node<'tree>,
    cancelled: &C,
    mut visit: F,
) -> Result<(), Interrupted>
where
    C: Fn() -> bool + ?Sized,
    F: FnMut(tree_sitter::Node<'tree>),
{
    let flow = walk_with_flow(root, |node| {
        if cancelled() {
            return ControlFlow::Break(());
        }
        visit(node);
        ControlFlow::Continue(())
    });

    match flow {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(()) => Err(Interrupted),
    }
}

fn walk_with_flow<'tree, F>(root: tree_sitter::Node<'tree>, mut visit: F) -> ControlFlow<()>
where
    F: FnMut(tree_sitter::Node<'tree>) -> ControlFlow<()>,
{
    let mut cursor = root.walk();
    loop {
        visit(cursor.node())?;
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return ControlFlow::Continue(());
            }
        }
    }
}
