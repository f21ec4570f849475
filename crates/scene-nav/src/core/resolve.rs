use log::{debug, info};
use crate::api::config::{NavConfig, UiLookup};
use crate::api::host::UiRegistry;
use crate::api::types::{SceneId, UiHandle};

/// Walk a lookup chain and return the first UI root it finds.
///
/// `scene` is the scene the root is expected to live in; it scopes the
/// declared mapping and the root-name scan.
pub fn resolve_ui<U: UiRegistry + ?Sized>(
    ui: &U,
    config: &NavConfig,
    chain: &[UiLookup],
    scene: &SceneId,
) -> Option<UiHandle> {
    chain
        .iter()
        .find_map(|step| resolve_step(ui, config, step, scene))
}

fn resolve_step<U: UiRegistry + ?Sized>(
    ui: &U,
    config: &NavConfig,
    step: &UiLookup,
    scene: &SceneId,
) -> Option<UiHandle> {
    let found = match step {
        UiLookup::Declared => {
            let root = config.scene_ui.get(scene)?;
            ui.scene_roots(scene)
                .into_iter()
                .find(|r| &r.name == root)
                .map(|r| r.handle)
        }
        UiLookup::Tag(tag) => ui.find_by_tag(tag),
        UiLookup::BackControlRoot => ui.back_control_root(),
        UiLookup::NamedParent(name) => {
            let object = ui.find_by_name(name)?;
            Some(ui.parent(object).unwrap_or(object))
        }
        UiLookup::RootNameContains(hints) => ui
            .scene_roots(scene)
            .into_iter()
            .find(|r| hints.iter().any(|h| r.name.contains(h.as_str())))
            .map(|r| r.handle),
    };

    match found {
        Some(handle) => info!("UI root for {} found via {:?}: {:?}", scene, step, handle),
        None => debug!("UI lookup {:?} for {} came up empty", step, scene),
    }
    found
}
