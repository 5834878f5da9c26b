use super::builder::{Forest, TreeNode};

/// Renders a forest as an indented outline, one `id  name` line per node and
/// two spaces of indentation per level.
pub fn render_forest(forest: &Forest) -> String {
    let mut out = String::new();
    for root in &forest.roots {
        let mut stack: Vec<(&TreeNode, usize)> = vec![(root, 0)];
        while let Some((node, depth)) = stack.pop() {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{}  {}\n", node.resource.id, node.resource.name));
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    out
}
