//! Dependency graph over registered descriptors

use std::collections::HashMap;

use crate::provider::{ProviderDescriptor, RegistrationError, RegistrationResult};
use crate::types::ProviderToken;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Group `order` into layers where every dependency sits in an earlier layer
///
/// Fails on the first dependency nobody provides, then on the first cycle,
/// before anything is resolved. Within a layer tokens keep registration order.
pub(crate) fn resolution_layers(
    order: &[ProviderToken],
    providers: &HashMap<ProviderToken, ProviderDescriptor>,
) -> RegistrationResult<Vec<Vec<ProviderToken>>> {
    for token in order {
        if let Some(descriptor) = providers.get(token) {
            if let Some(dependency) = descriptor
                .dependencies()
                .iter()
                .find(|dep| !providers.contains_key(*dep))
            {
                return Err(RegistrationError::MissingDependency {
                    token: token.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }

    let mut marks = HashMap::with_capacity(order.len());
    let mut stack = Vec::new();
    for token in order {
        visit(token, providers, &mut marks, &mut stack)?;
    }

    let mut depths: HashMap<ProviderToken, usize> = HashMap::with_capacity(order.len());
    let mut layers: Vec<Vec<ProviderToken>> = Vec::new();
    for token in order {
        let depth = depth_of(token, providers, &mut depths);
        if layers.len() <= depth {
            layers.resize_with(depth + 1, Vec::new);
        }
        layers[depth].push(token.clone());
    }
    Ok(layers)
}

fn visit(
    token: &ProviderToken,
    providers: &HashMap<ProviderToken, ProviderDescriptor>,
    marks: &mut HashMap<ProviderToken, Mark>,
    stack: &mut Vec<ProviderToken>,
) -> RegistrationResult<()> {
    match marks.get(token) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|t| t == token).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(token.clone());
            return Err(RegistrationError::CyclicDependency { cycle });
        }
        None => {}
    }

    marks.insert(token.clone(), Mark::Visiting);
    stack.push(token.clone());
    if let Some(descriptor) = providers.get(token) {
        for dependency in descriptor.dependencies() {
            visit(dependency, providers, marks, stack)?;
        }
    }
    stack.pop();
    marks.insert(token.clone(), Mark::Done);
    Ok(())
}

// Only called on an acyclic graph.
fn depth_of(
    token: &ProviderToken,
    providers: &HashMap<ProviderToken, ProviderDescriptor>,
    depths: &mut HashMap<ProviderToken, usize>,
) -> usize {
    if let Some(depth) = depths.get(token) {
        return *depth;
    }
    let depth = providers
        .get(token)
        .map(|descriptor| {
            descriptor
                .dependencies()
                .iter()
                .map(|dep| depth_of(dep, providers, depths) + 1)
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);
    depths.insert(token.clone(), depth);
    depth
}
