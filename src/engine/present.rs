//! Presents composed scenes in a bevy window.
//!
//! The scene is rasterized into a [`PixelCanvas`] every frame and uploaded as
//! the texture of one full-window sprite. Canvas labels become `Text2d`
//! entities on top of it. The HUD line, toasts and the loadout overlay are UI
//! text driven by raid notices.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use super::{run_raid_frame, RaidNoticeEvent, RaidSession};
use crate::catalog::Rgba;
use crate::config::RaidConfig;
use crate::render::{compose, PixelCanvas, Surface, SurfaceSize};
use crate::sim::{Backpack, RaidNotice};

const TOAST_SECONDS: f32 = 2.0;

pub struct ScenePresentPlugin;

impl Plugin for ScenePresentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Toast>()
            .add_systems(Startup, setup_presentation)
            .add_systems(
                Update,
                (
                    present_scene.run_if(resource_exists::<RaidSession>),
                    clear_scene.run_if(not(resource_exists::<RaidSession>)),
                    update_hud,
                    update_toast,
                    update_overlay,
                )
                    .after(run_raid_frame),
            );
    }
}

#[derive(Resource)]
struct SceneTarget {
    image: Handle<Image>,
    canvas: PixelCanvas,
}

#[derive(Resource)]
struct Toast {
    timer: Timer,
}

impl Default for Toast {
    fn default() -> Self {
        let mut timer = Timer::from_seconds(TOAST_SECONDS, TimerMode::Once);
        timer.pause();
        Self { timer }
    }
}

#[derive(Component)]
struct SceneSprite;

#[derive(Component)]
struct SceneLabel;

#[derive(Component)]
struct HudText;

#[derive(Component)]
struct ToastText;

#[derive(Component)]
struct OverlayText;

fn to_color(c: Rgba) -> Color {
    Color::srgba_u8(c.r, c.g, c.b, c.a)
}

fn setup_presentation(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let image = images.add(Image::new_fill(
        Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    ));

    commands.spawn(Camera2d);
    commands.spawn((
        Sprite::from_image(image.clone()),
        Transform::default(),
        Visibility::Hidden,
        SceneSprite,
    ));
    commands.insert_resource(SceneTarget {
        image,
        canvas: PixelCanvas::new(1, 1),
    });

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText,
    ));
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(to_color(Rgba::rgb(0xFA, 0xCC, 0x15))),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(48.0),
            left: Val::Px(12.0),
            ..default()
        },
        Visibility::Hidden,
        ToastText,
    ));
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(96.0),
            right: Val::Px(24.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
        Visibility::Hidden,
        OverlayText,
    ));
}

fn present_scene(
    mut commands: Commands,
    session: Res<RaidSession>,
    config: Res<RaidConfig>,
    target: Option<ResMut<SceneTarget>>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<(&mut Sprite, &mut Visibility), With<SceneSprite>>,
    labels: Query<Entity, With<SceneLabel>>,
) {
    let Some(mut target) = target else { return };
    let size = SurfaceSize::from_vec2(session.viewport());
    if target.canvas.size() != size {
        target.canvas = PixelCanvas::scaled(size, config.render_scale);
    }

    let scene = compose(session.state(), size, session.elapsed(), config.view_distance);
    scene.render(&mut target.canvas);

    let canvas = &target.canvas;
    if let Some(image) = images.get_mut(&target.image) {
        *image = Image::new(
            Extent3d {
                width: canvas.pixel_width(),
                height: canvas.pixel_height(),
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            canvas.pixels().to_vec(),
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        );
    }
    for (mut sprite, mut visibility) in &mut sprites {
        sprite.custom_size = Some(size.as_vec2());
        *visibility = Visibility::Visible;
    }

    for entity in &labels {
        commands.entity(entity).despawn();
    }
    let half = size.as_vec2() / 2.0;
    for label in canvas.labels() {
        // Screen space is y-down from the top-left, the 2d camera is y-up from the center
        commands.spawn((
            Text2d::new(label.text.clone()),
            TextFont {
                font_size: label.size,
                ..default()
            },
            TextColor(to_color(label.color)),
            Transform::from_xyz(label.pos.x - half.x, half.y - label.pos.y, 1.0),
            SceneLabel,
        ));
    }
}

fn clear_scene(
    mut commands: Commands,
    mut sprites: Query<&mut Visibility, With<SceneSprite>>,
    labels: Query<Entity, With<SceneLabel>>,
) {
    for mut visibility in &mut sprites {
        *visibility = Visibility::Hidden;
    }
    for entity in &labels {
        commands.entity(entity).despawn();
    }
}

fn update_hud(
    mut notices: EventReader<RaidNoticeEvent>,
    session: Option<Res<RaidSession>>,
    mut texts: Query<&mut Text, With<HudText>>,
) {
    let changed = notices
        .read()
        .filter(|RaidNoticeEvent(n)| {
            matches!(
                n,
                RaidNotice::HpChanged { .. } | RaidNotice::InventoryChanged { .. }
            )
        })
        .count()
        > 0;
    if !changed && session.is_some() {
        return;
    }
    let line = session
        .map(|s| {
            let hud = s.state().hud();
            format!("HP {}   ITEMS {}", hud.hp, hud.items)
        })
        .unwrap_or_default();
    for mut text in &mut texts {
        text.0.clone_from(&line);
    }
}

fn update_toast(
    time: Res<Time>,
    mut notices: EventReader<RaidNoticeEvent>,
    mut toast: ResMut<Toast>,
    mut texts: Query<(&mut Text, &mut Visibility), With<ToastText>>,
) {
    let latest = notices.read().filter_map(|RaidNoticeEvent(n)| n.toast()).last();
    if let Some(message) = latest {
        toast.timer.reset();
        toast.timer.unpause();
        for (mut text, _) in &mut texts {
            text.0 = message.clone();
        }
    }

    toast.timer.tick(time.delta());
    let showing = !toast.timer.paused() && !toast.timer.finished();
    for (_, mut visibility) in &mut texts {
        *visibility = if showing {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

fn update_overlay(
    session: Option<Res<RaidSession>>,
    mut texts: Query<(&mut Text, &mut Visibility), With<OverlayText>>,
) {
    let open = session.as_ref().filter(|s| s.state().overlay_open);
    for (mut text, mut visibility) in &mut texts {
        match open {
            Some(s) => {
                text.0 = loadout_text(&s.state().backpack);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Loadout overlay body: weight budget, value, then one line per item
pub fn loadout_text(backpack: &Backpack) -> String {
    let mut out = format!(
        "LOADOUT (PAUSED)\n{:.1} / {:.1} kg   ${}\n",
        backpack.total_weight(),
        backpack.capacity,
        backpack.total_value()
    );
    if backpack.is_empty() {
        out.push_str("\n(empty)");
    }
    for item in &backpack.items {
        out.push_str(&format!(
            "\n{}  {:.1} kg  ${}",
            item.name, item.weight, item.value
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::{ItemId, LootTable};

    #[test]
    fn test_loadout_text_lists_items() {
        let table = LootTable::builtin();
        let mut backpack = Backpack::new(20.0);
        backpack
            .try_add(table.items[4].instance(ItemId("a".into())))
            .unwrap();
        let text = loadout_text(&backpack);
        assert!(text.starts_with("LOADOUT"));
        assert!(text.contains("Bandage"));
        assert!(text.contains("/ 20.0 kg"));
    }

    #[test]
    fn test_empty_loadout() {
        let text = loadout_text(&Backpack::new(20.0));
        assert!(text.contains("(empty)"));
        assert!(text.contains("0.0 / 20.0 kg"));
    }
}
