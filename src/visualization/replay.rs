use bevy::prelude::*;
use bevy::math::primitives::Sphere;

use crate::simulation::states::NVec3;
use crate::visualization::trajectory::Trajectories;

/// Component tagging each sphere with its track index
#[derive(Component)]
struct TrackIndex(pub usize);

/// Half-width of the region the trajectories are scaled into, in screen units
const VIEW_EXTENT: f32 = 400.0;

/// Distance of the camera from the origin
const CAMERA_DISTANCE: f32 = 1500.0;

const SPHERE_RADIUS: f32 = 8.0;

/// Recorded frames advanced per second of wall time
const FRAMES_PER_SECOND: f32 = 60.0;

#[derive(Resource)]
struct Replay {
    tracks: Vec<Vec<Vec3>>, // already centered and scaled
    hues: Vec<f32>,
    colors: Vec<Color>,
    frames: usize,
    frame: usize,
    elapsed: f32,
    paused: bool,
    top_down: bool,
}

impl Replay {
    fn new(trajectories: &Trajectories) -> Self {
        let (center, scale) = match trajectories.bounds() {
            Some((lo, hi)) => {
                let extent = (hi - lo).amax().max(f64::EPSILON);
                ((lo + hi) * 0.5, 2.0 * VIEW_EXTENT as f64 / extent)
            }
            None => (NVec3::zeros(), 1.0),
        };

        let tracks = trajectories
            .tracks
            .iter()
            .map(|t| {
                t.iter()
                    .map(|p| {
                        let q = (p - center) * scale;
                        Vec3::new(q.x as f32, q.y as f32, q.z as f32)
                    })
                    .collect()
            })
            .collect();

        let n = trajectories.num_bodies().max(1);
        let hues: Vec<f32> = (0..n).map(|i| 360.0 * i as f32 / n as f32).collect();
        let colors = hues.iter().map(|&h| Color::hsl(h, 0.8, 0.6)).collect();

        Self {
            tracks,
            hues,
            colors,
            frames: trajectories.frames(),
            frame: 0,
            elapsed: 0.0,
            paused: false,
            top_down: false,
        }
    }
}

/// Open a window replaying `trajectories` frame by frame, with trails.
///
/// Space pauses, `P` toggles between the 3D view and the XY projection
/// (camera looking down the Z axis).
pub fn run_replay(trajectories: Trajectories, labels: &[String]) {
    let replay = Replay::new(&trajectories);
    tracing::info!(
        "replaying {} frames of {} bodies",
        replay.frames,
        trajectories.num_bodies()
    );
    for (label, hue) in labels.iter().zip(&replay.hues) {
        tracing::info!("{label}: hue {hue:.0}");
    }

    App::new()
        .insert_resource(replay)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_replay)
        .add_systems(Update, (handle_keys, advance_frame, sync_spheres, draw_trails))
        .run();
}

fn setup_replay(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    replay: Res<Replay>,
) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)),
            ..Default::default()
        },
        transform: perspective_view(),
        ..Default::default()
    });

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 1000.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(100.0, 100.0, CAMERA_DISTANCE),
        ..Default::default()
    });

    let mesh = meshes.add(Sphere::new(SPHERE_RADIUS).mesh());
    for (i, track) in replay.tracks.iter().enumerate() {
        let start = track.first().copied().unwrap_or(Vec3::ZERO);
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: materials.add(StandardMaterial {
                    base_color: replay.colors[i],
                    unlit: true,
                    ..Default::default()
                }),
                transform: Transform::from_translation(start),
                ..Default::default()
            },
            TrackIndex(i),
        ));
    }
}

fn perspective_view() -> Transform {
    Transform::from_xyz(200.0, 150.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y)
}

fn top_down_view() -> Transform {
    Transform::from_xyz(0.0, 0.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y)
}

fn handle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut replay: ResMut<Replay>,
    mut camera: Query<&mut Transform, With<Camera3d>>,
) {
    if keys.just_pressed(KeyCode::Space) {
        replay.paused = !replay.paused;
    }
    if keys.just_pressed(KeyCode::KeyP) {
        replay.top_down = !replay.top_down;
        let view = if replay.top_down { top_down_view() } else { perspective_view() };
        for mut transform in &mut camera {
            *transform = view;
        }
    }
}

fn advance_frame(time: Res<Time>, mut replay: ResMut<Replay>) {
    if replay.paused || replay.frames == 0 {
        return;
    }
    replay.elapsed += time.delta_seconds();
    let step = (replay.elapsed * FRAMES_PER_SECOND) as usize;
    if step > 0 {
        replay.elapsed -= step as f32 / FRAMES_PER_SECOND;
        // hold on the last frame
        replay.frame = (replay.frame + step).min(replay.frames - 1);
    }
}

fn sync_spheres(replay: Res<Replay>, mut query: Query<(&TrackIndex, &mut Transform)>) {
    for (TrackIndex(i), mut transform) in &mut query {
        if let Some(p) = replay.tracks.get(*i).and_then(|t| t.get(replay.frame)) {
            transform.translation = *p;
        }
    }
}

fn draw_trails(replay: Res<Replay>, mut gizmos: Gizmos) {
    for (track, color) in replay.tracks.iter().zip(&replay.colors) {
        let end = (replay.frame + 1).min(track.len());
        gizmos.linestrip(track[..end].iter().copied(), *color);
    }
}
