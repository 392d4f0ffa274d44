use bevy::log::LogPlugin;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::{PrimaryWindow, WindowResolution};

use crate::simulation::constraint::BoundingCircle;
use crate::simulation::scenario::{Rgb, Scenario};
use crate::simulation::states::{BodyId, NVec2};

/// Links a circle entity to the body it draws
#[derive(Component)]
struct BodyHandle(pub BodyId);

/// Radius of bodies spawned with a left click
const CLICK_RADIUS: f64 = 10.0;

const FALLBACK_COLOR: Rgb = [255, 255, 255];

pub fn run_2d(scenario: Scenario) {
    log::info!("run_2d: starting Bevy 2D viewer with {} bodies", scenario.solver.len());

    let (width, height) = scenario.window;

    App::new()
        .insert_resource(scenario)
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "verletsim".into(),
                        resolution: WindowResolution::new(width as f32, height as f32),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                // env_logger already owns the `log` facade
                .disable::<LogPlugin>(),
        )
        .add_systems(Startup, setup_bodies_system)
        .add_systems(Update, (pointer_system, physics_step_system, sync_transforms_system).chain())
        .run();
}

/// Solver space is screen-like (+y down, origin top-left); Bevy is +y up
/// with the camera centred on the bounding circle.
fn to_screen(bounds: &BoundingCircle, p: NVec2) -> Vec2 {
    Vec2::new((p.x - bounds.center.x) as f32, (bounds.center.y - p.y) as f32)
}

fn to_world(bounds: &BoundingCircle, v: Vec2) -> NVec2 {
    NVec2::new(bounds.center.x + v.x as f64, bounds.center.y - v.y as f64)
}

fn spawn_body_sprite(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    id: BodyId,
    radius: f64,
    color: Rgb,
    at: Vec2,
) {
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(Circle::new(radius as f32))),
            material: materials.add(ColorMaterial::from(Color::srgb_u8(color[0], color[1], color[2]))),
            transform: Transform::from_xyz(at.x, at.y, 0.0),
            ..Default::default()
        },
        BodyHandle(id),
    ));
}

fn setup_bodies_system(mut commands: Commands, scenario: Res<Scenario>, mut meshes: ResMut<Assets<Mesh>>, mut materials: ResMut<Assets<ColorMaterial>>) {
    commands.spawn(Camera2dBundle::default());

    // Backdrop showing the containing circle
    let bounds = *scenario.solver.bounds();
    commands.spawn(MaterialMesh2dBundle {
        mesh: Mesh2dHandle(meshes.add(Circle::new(bounds.radius as f32))),
        material: materials.add(ColorMaterial::from(Color::srgb(0.08, 0.08, 0.1))),
        transform: Transform::from_xyz(0.0, 0.0, -1.0),
        ..Default::default()
    });

    for (id, body) in scenario.solver.bodies() {
        let color = scenario.color_of(id).unwrap_or(FALLBACK_COLOR);
        let at = to_screen(&bounds, body.position());
        spawn_body_sprite(&mut commands, &mut meshes, &mut materials, id, body.radius(), color, at);
    }
}

/// Left click adds a body under the cursor, right click removes the one under it
fn pointer_system(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut scenario: ResMut<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let left = buttons.just_pressed(MouseButton::Left);
    let right = buttons.just_pressed(MouseButton::Right);
    if !left && !right {
        return;
    }

    let Ok(window) = windows.get_single() else { return };
    let Some(cursor) = window.cursor_position() else { return };
    let Ok((camera, camera_transform)) = cameras.get_single() else { return };
    let Some(point) = camera.viewport_to_world_2d(camera_transform, cursor) else { return };

    let bounds = *scenario.solver.bounds();
    let world = to_world(&bounds, point);

    if left {
        let color: Rgb = rand::random();
        if let Some(id) = scenario.add_colored(world, CLICK_RADIUS, color) {
            log::info!("spawned {id} at ({:.1}, {:.1})", world.x, world.y);
            spawn_body_sprite(&mut commands, &mut meshes, &mut materials, id, CLICK_RADIUS, color, point);
        }
    }

    if right {
        let hit = scenario
            .solver
            .bodies()
            .find(|(_, b)| (b.position() - world).norm() <= b.radius())
            .map(|(id, _)| id);

        if let Some(id) = hit {
            scenario.remove(id);
            log::info!("removed {id}");
        }
    }
}

fn physics_step_system(time: Res<Time>, mut scenario: ResMut<Scenario>) {
    scenario.solver.update(time.delta_seconds_f64());
}

/// Copy solver positions into transforms; despawn circles whose body is gone
fn sync_transforms_system(mut commands: Commands, scenario: Res<Scenario>, mut query: Query<(Entity, &BodyHandle, &mut Transform)>) {
    let bounds = *scenario.solver.bounds();

    for (entity, BodyHandle(id), mut transform) in &mut query {
        match scenario.solver.get_body(*id) {
            Some(snapshot) => {
                let at = to_screen(&bounds, snapshot.position);
                transform.translation.x = at.x;
                transform.translation.y = at.y;
            }
            None => commands.entity(entity).despawn(),
        }
    }
}
