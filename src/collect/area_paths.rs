use crate::devops::models::ClassificationNode;

/// One flattened area-path node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaPathRow<'a> {
    pub project_url: &'a str,
    pub path: String,
    pub name: &'a str,
}

/// Rewrite `\<project>\Area...` to `<project>...`.
///
/// The API reports classification paths rooted at the hidden `Area` node, while consumers expect
/// project-relative paths. Applying the rewrite twice is a no-op.
#[must_use]
pub fn rewrite_area_path(path: &str, project_name: &str) -> String {
    path.replace(&format!("\\{project_name}\\Area"), project_name)
}

/// Walks an area-path tree, yielding the root followed by every leaf in pre-order.
///
/// Interior nodes below the root are descended into but not emitted themselves.
#[derive(Debug)]
pub struct AreaPaths<'a> {
    project_url: &'a str,
    project_name: &'a str,
    root: Option<&'a ClassificationNode>,
    stack: Vec<&'a ClassificationNode>,
}

impl<'a> AreaPaths<'a> {
    fn row(&self, node: &'a ClassificationNode) -> AreaPathRow<'a> {
        AreaPathRow {
            project_url: self.project_url,
            path: rewrite_area_path(&node.path, self.project_name),
            name: &node.name,
        }
    }
}

impl<'a> Iterator for AreaPaths<'a> {
    type Item = AreaPathRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.stack.extend(root.child_nodes().iter().rev());
            return Some(self.row(root));
        }

        while let Some(node) = self.stack.pop() {
            let children = node.child_nodes();
            if children.is_empty() {
                return Some(self.row(node));
            }

            // reversed so the first child is popped first
            self.stack.extend(children.iter().rev());
        }

        None
    }
}

/// Flatten an area-path tree into rows.
#[must_use]
pub fn flatten<'a>(root: &'a ClassificationNode, project_url: &'a str, project_name: &'a str) -> AreaPaths<'a> {
    AreaPaths {
        project_url,
        project_name,
        root: Some(root),
        stack: Vec::new(),
    }
}
