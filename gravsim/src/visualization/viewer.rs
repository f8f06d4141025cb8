//! Bevy front end.
//!
//! Owns the window, camera and input. Everything it does to the bodies goes
//! through `Command`s submitted to the `Simulation` resource; everything it
//! draws is read from that resource after the frame has run.
//!
//! Keys:
//! - Up / Down      double / halve the simulation speed
//! - P              pause
//! - T / R          toggle trajectories / flip their time direction
//! - , / .          fewer / more trajectory steps
//! - G              grid follows the camera
//! - [ / ]          fewer / more grid divisions, - / = shrink / grow the grid
//! - Tab / Esc      select next body / clear selection
//! - N              new body in front of the camera
//! - Delete         remove the selected body
//! - K / L          halve / double the selected body's mass
//! - F              camera follows the selected body
//! - 1..4           load a preset

use std::collections::HashSet;

use bevy::prelude::*;

use crate::simulation::engine::{Command, Diagnostic, FrameInput, Simulation};
use crate::simulation::grid::GridConfig;
use crate::simulation::params::RunSettings;
use crate::simulation::scenario::{BodySpec, Preset};
use crate::simulation::states::{BodyHandle, NVec3, Renderable, Rgb};
use crate::visualization::camera::{fly_camera_look, fly_camera_movement, fly_camera_zoom, FlyCamera};

/// Tags each sphere with the body it shows
#[derive(Component)]
struct BodyView(BodyHandle);

#[derive(Component)]
struct Hud;

#[derive(Resource)]
struct BodyAssets {
    sphere: Handle<Mesh>,
}

/// Camera tracking of one body, by handle so it survives list edits
#[derive(Resource, Default)]
struct FollowState {
    target: Option<BodyHandle>,
    last: Option<NVec3>,
}

/// Last thing worth telling the user
#[derive(Resource, Default)]
struct StatusLine(String);

const CAMERA_START: Vec3 = Vec3::new(0.0, 120.0, 260.0);
const GRID_COLOR: Color = Color::srgba(0.35, 0.4, 0.55, 0.5);
const SELECTION_COLOR: Color = Color::srgb(1.0, 1.0, 0.2);
const GLOW_GAIN: f32 = 4.0;
const NEW_BODY_DISTANCE: f32 = 40.0;
const MAX_SPEED: f64 = 1024.0;
const MIN_SPEED: f64 = 1.0 / 1024.0;

fn to_vec3(v: &NVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

fn to_nvec3(v: Vec3) -> NVec3 {
    NVec3::new(v.x as f64, v.y as f64, v.z as f64)
}

fn to_color(c: Rgb) -> Color {
    Color::srgb(c[0], c[1], c[2])
}

/// Open the window and run until it is closed
pub fn run_viewer(simulation: Simulation, settings: RunSettings) {
    info!("viewer: starting with {} bodies", simulation.bodies().len());

    App::new()
        .insert_resource(simulation)
        .insert_resource(settings)
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 150.0,
        })
        .init_resource::<FollowState>()
        .init_resource::<StatusLine>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "gravsim".into(),
                resolution: (1366.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                (fly_camera_movement, fly_camera_look, fly_camera_zoom, keyboard_commands),
                frame_systems(),
                sync_bodies,
                (draw_grid, draw_trajectories, draw_selection),
                (collect_diagnostics, update_hud).chain(),
            )
                .chain(),
        )
        .run();
}

/// Camera tracking moves the camera before the frame reads its position
fn frame_systems() -> impl IntoSystemConfigs<()> {
    (follow_body, step_simulation).chain()
}

fn setup(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let cam = FlyCamera::looking_at(CAMERA_START, Vec3::ZERO);
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(CAMERA_START).with_rotation(cam.rotation()),
            projection: Projection::Perspective(PerspectiveProjection {
                fov: 45.0_f32.to_radians(),
                near: 0.1,
                far: 10_000.0,
                ..default()
            }),
            ..default()
        },
        cam,
    ));

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 50_000_000.0,
            range: 2_000.0,
            ..default()
        },
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..default()
    });

    // unit sphere, scaled per body
    let (sectors, stacks) = crate::simulation::states::MESH_RESOLUTION;
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(sectors as usize, stacks as usize));
    commands.insert_resource(BodyAssets { sphere });

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 16.0,
                color: Color::srgb(0.85, 0.85, 0.85),
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        }),
        Hud,
    ));
}

fn step_simulation(
    time: Res<Time>,
    settings: Res<RunSettings>,
    mut sim: ResMut<Simulation>,
    camera: Query<&Transform, With<FlyCamera>>,
) {
    let input = FrameInput {
        dt_real: time.delta_seconds_f64(),
        camera: camera.get_single().ok().map(|t| to_nvec3(t.translation)),
    };
    sim.frame(&input, &settings);
}

fn follow_body(
    sim: Res<Simulation>,
    mut follow: ResMut<FollowState>,
    mut camera: Query<&mut Transform, With<FlyCamera>>,
) {
    let Some(target) = follow.target else {
        return;
    };
    let Some(body) = sim.body(target) else {
        // body is gone, stop following
        *follow = FollowState::default();
        return;
    };

    if let Some(last) = follow.last {
        let delta = to_vec3(&(body.x - last));
        for mut t in &mut camera {
            t.translation += delta;
        }
    }
    follow.last = Some(body.x);
}

fn material_for(color: Rgb, glows: bool) -> StandardMaterial {
    if glows {
        StandardMaterial {
            base_color: to_color(color),
            emissive: LinearRgba::rgb(color[0] * GLOW_GAIN, color[1] * GLOW_GAIN, color[2] * GLOW_GAIN),
            unlit: true,
            ..default()
        }
    } else {
        StandardMaterial {
            base_color: to_color(color),
            perceptual_roughness: 0.8,
            ..default()
        }
    }
}

/// Spawn, move, restyle and despawn spheres to match the live bodies
fn sync_bodies(
    mut commands: Commands,
    sim: Res<Simulation>,
    assets: Res<BodyAssets>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &BodyView, &mut Transform, &Handle<StandardMaterial>)>,
) {
    let mut shown = HashSet::new();

    for (entity, BodyView(handle), mut transform, mat_handle) in &mut query {
        let Some(body) = sim.body(*handle) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };
        shown.insert(*handle);

        let t = body.transform();
        transform.translation = to_vec3(&t.vector);
        transform.scale = Vec3::splat(body.radius() as f32);

        if let Some(mat) = materials.get_mut(mat_handle) {
            let wanted = material_for(body.color(), body.glows());
            if mat.base_color != wanted.base_color || mat.unlit != wanted.unlit {
                *mat = wanted;
            }
        }
    }

    for (handle, body) in sim.bodies().iter() {
        if shown.contains(&handle) {
            continue;
        }
        commands.spawn((
            PbrBundle {
                mesh: assets.sphere.clone(),
                material: materials.add(material_for(body.color(), body.glows())),
                transform: Transform::from_translation(to_vec3(&body.position()))
                    .with_scale(Vec3::splat(body.radius() as f32)),
                ..default()
            },
            BodyView(handle),
        ));
    }
}

fn draw_grid(sim: Res<Simulation>, mut gizmos: Gizmos) {
    for (a, b) in sim.grid().segments() {
        gizmos.line(to_vec3(&a), to_vec3(&b), GRID_COLOR);
    }
}

fn draw_trajectories(sim: Res<Simulation>, mut gizmos: Gizmos) {
    for (_, path) in sim.trajectories() {
        let Some(first) = path.points.first() else {
            continue;
        };
        gizmos.linestrip(path.positions().map(|p| to_vec3(&p)), to_color(first.color));
    }
}

fn draw_selection(sim: Res<Simulation>, mut gizmos: Gizmos) {
    if let Some(body) = sim.selected_body() {
        gizmos.sphere(
            to_vec3(&body.position()),
            Quat::IDENTITY,
            body.radius() as f32 * 1.6,
            SELECTION_COLOR,
        );
    }
}

fn keyboard_commands(
    keys: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<Simulation>,
    mut settings: ResMut<RunSettings>,
    mut follow: ResMut<FollowState>,
    mut status: ResMut<StatusLine>,
    camera: Query<&Transform, With<FlyCamera>>,
) {
    if keys.just_pressed(KeyCode::ArrowUp) {
        settings.sim_speed = (settings.sim_speed * 2.0).min(MAX_SPEED);
        info!("speed x{}", settings.sim_speed);
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        settings.sim_speed = (settings.sim_speed / 2.0).max(MIN_SPEED);
        info!("speed x{}", settings.sim_speed);
    }
    if keys.just_pressed(KeyCode::KeyP) {
        settings.paused = !settings.paused;
    }
    if keys.just_pressed(KeyCode::KeyT) {
        settings.show_trajectories = !settings.show_trajectories;
    }
    if keys.just_pressed(KeyCode::KeyR) {
        settings.trajectory.direction = settings.trajectory.direction.flipped();
        status.0 = format!("trajectories: {:?}", settings.trajectory.direction);
    }
    if keys.just_pressed(KeyCode::Comma) {
        settings.trajectory.steps = settings.trajectory.steps.saturating_sub(100);
    }
    if keys.just_pressed(KeyCode::Period) {
        settings.trajectory.steps += 100;
    }
    if keys.just_pressed(KeyCode::KeyG) {
        settings.follow_camera = !settings.follow_camera;
    }

    let grid = sim.grid().config();
    let mut resized = None;
    if keys.just_pressed(KeyCode::BracketLeft) {
        resized = Some(GridConfig { divisions: grid.divisions.saturating_sub(5).max(1), ..grid });
    }
    if keys.just_pressed(KeyCode::BracketRight) {
        resized = Some(GridConfig { divisions: grid.divisions + 5, ..grid });
    }
    if keys.just_pressed(KeyCode::Minus) {
        resized = Some(GridConfig { size: grid.size / 1.25, ..grid });
    }
    if keys.just_pressed(KeyCode::Equal) {
        resized = Some(GridConfig { size: grid.size * 1.25, ..grid });
    }
    if let Some(config) = resized {
        sim.submit(Command::RebuildGrid(config));
    }

    let selected = sim.selection();
    if keys.just_pressed(KeyCode::Tab) {
        let n = sim.bodies().len();
        if n > 0 {
            let next = selected
                .and_then(|h| sim.bodies().index_of(h))
                .map_or(0, |i| (i + 1) % n);
            sim.submit(Command::SelectIndex(next));
        }
    }
    if keys.just_pressed(KeyCode::Escape) {
        sim.submit(Command::Select(None));
    }

    if keys.just_pressed(KeyCode::KeyN) {
        if let Ok(t) = camera.get_single() {
            let at = t.translation + *t.forward() * NEW_BODY_DISTANCE;
            let spec = BodySpec::new(to_nvec3(at), NVec3::zeros(), 10.0, 1.5).with_color([0.7, 0.9, 0.7]);
            sim.submit(Command::AddBody(spec));
        }
    }

    if let Some(handle) = selected {
        if keys.just_pressed(KeyCode::Delete) || keys.just_pressed(KeyCode::Backspace) {
            sim.submit(Command::RemoveBody(handle));
        }

        let scale = if keys.just_pressed(KeyCode::KeyK) {
            Some(0.5)
        } else if keys.just_pressed(KeyCode::KeyL) {
            Some(2.0)
        } else {
            None
        };
        let edit = scale.and_then(|s| {
            sim.body(handle).map(|body| BodySpec {
                x: body.x,
                v: body.v,
                m: body.m * s,
                radius: body.radius,
                color: body.color,
                glows: body.glows,
            })
        });
        if let Some(spec) = edit {
            sim.submit(Command::EditBody(handle, spec));
        }

        if keys.just_pressed(KeyCode::KeyF) {
            if follow.target == Some(handle) {
                *follow = FollowState::default();
            } else {
                *follow = FollowState { target: Some(handle), last: None };
            }
        }
    }

    let digits = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
    for (key, preset) in digits.into_iter().zip(Preset::ALL) {
        if keys.just_pressed(key) {
            info!("loading preset {:?}", preset);
            sim.submit(Command::LoadScenario(preset.build()));
            *follow = FollowState::default();
        }
    }
}

fn collect_diagnostics(mut sim: ResMut<Simulation>, mut status: ResMut<StatusLine>) {
    for d in sim.drain_diagnostics() {
        status.0 = match d {
            Diagnostic::BodyFrozen { handle, reason } => format!("body {:?} frozen: {}", handle, reason),
            Diagnostic::CommandRejected(reason) => {
                warn!("{}", reason);
                reason
            }
        };
    }
}

fn update_hud(
    sim: Res<Simulation>,
    settings: Res<RunSettings>,
    status: Res<StatusLine>,
    mut query: Query<&mut Text, With<Hud>>,
) {
    let selection = match sim.selected_body() {
        Some(b) => format!("m = {:.3}  |v| = {:.3}", b.m, b.v.norm()),
        None => "none".to_string(),
    };
    let line = format!(
        "t = {:.1}  speed x{}{}  bodies {}  steps {}\nselected: {}\n{}",
        sim.time(),
        settings.sim_speed,
        if settings.paused { " (paused)" } else { "" },
        sim.bodies().len(),
        settings.trajectory.steps,
        selection,
        status.0,
    );

    for mut text in &mut query {
        if let Some(section) = text.sections.first_mut() {
            section.value.clone_from(&line);
        }
    }
}
