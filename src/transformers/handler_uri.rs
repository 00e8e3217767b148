use super::NodeTransformer;
use crate::convention::join_uri;
use crate::node_tree::Node;

/// Prefix each action's conventional URI with its handler's path segment.
pub struct AddHandlerUriToActions;

impl NodeTransformer for AddHandlerUriToActions {
    fn name(&self) -> &str {
        "add_handler_uri_to_actions"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            let handler_uri = node.uri.clone();
            for action in node.actions_mut() {
                action.uri = join_uri(&handler_uri, &action.relative_uri);
            }
        }
    }
}
