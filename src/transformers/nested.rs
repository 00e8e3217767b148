use std::collections::HashMap;

use super::NodeTransformer;
use crate::convention::join_uri;
use crate::node_tree::Node;

/// Tidy handler URIs that come from nested directories.
///
/// - A handler named after its own directory (`news/NewsController`) sits
///   at the directory URI: `news/news` → `news`.
/// - Handlers beside such a parent nest under the parent's `show` model
///   parameter: `news/comments` → `news/{news}/comments`.
pub struct FixUrisOfNestedHandlers;

impl NodeTransformer for FixUrisOfNestedHandlers {
    fn name(&self) -> &str {
        "fix_uris_of_nested_handlers"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            collapse_self_named(node);
        }
        nest_under_parents(nodes);
    }
}

fn collapse_self_named(node: &mut Node) {
    let Some((parent, last)) = node.uri.rsplit_once('/') else {
        return;
    };
    let parent_last = parent.rsplit('/').next().unwrap_or(parent);
    if parent_last == last {
        let collapsed = parent.to_string();
        rewrite(node, collapsed);
    }
}

fn nest_under_parents(nodes: &mut [Node]) {
    let parameters: HashMap<String, String> = nodes
        .iter()
        .filter(|node| !node.uri.is_empty())
        .filter_map(|node| {
            node.show_parameter()
                .map(|param| (node.uri.clone(), param.to_string()))
        })
        .collect();
    if parameters.is_empty() {
        return;
    }

    // Parents first so grandchildren see their parent's new URI.
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&index| nodes[index].uri.matches('/').count());

    let mut rewritten: HashMap<String, String> = HashMap::new();
    for index in order {
        let uri = &nodes[index].uri;
        let Some((parent, last)) = uri.rsplit_once('/') else {
            continue;
        };
        let parent_uri = rewritten
            .get(parent)
            .cloned()
            .unwrap_or_else(|| parent.to_string());
        let nested = match parameters.get(parent) {
            Some(param) => format!("{parent_uri}/{{{param}}}/{last}"),
            None => join_uri(&parent_uri, last),
        };
        rewritten.insert(uri.clone(), nested);
    }

    for node in nodes.iter_mut() {
        if let Some(nested) = rewritten.get(&node.uri) {
            if *nested != node.uri {
                rewrite(node, nested.clone());
            }
        }
    }
}

/// Move a node to `new_uri`, carrying along every action URI that still
/// starts with the old one.
fn rewrite(node: &mut Node, new_uri: String) {
    let old_uri = std::mem::replace(&mut node.uri, new_uri);
    let new_uri = node.uri.clone();
    for action in node.actions_mut() {
        if let Some(uri) = replace_prefix(&action.uri, &old_uri, &new_uri) {
            action.uri = uri;
        }
    }
}

fn replace_prefix(uri: &str, old: &str, new: &str) -> Option<String> {
    if old.is_empty() {
        return None;
    }
    if uri == old {
        return Some(new.to_string());
    }
    uri.strip_prefix(old)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|rest| join_uri(new, rest))
}
