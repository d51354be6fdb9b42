/// Keyframe animation clips, a looping mixer, and a frame clock
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::scene::{NodeId, SceneGraph};
use crate::transform::RotationState;

/// Measures time between frames
#[derive(Debug, Clone, Default)]
pub struct Clock {
    last: Option<Instant>,
    elapsed: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call (0 on the first call)
    pub fn delta(&mut self) -> f32 {
        self.delta_at(Instant::now())
    }

    pub fn delta_at(&mut self, now: Instant) -> f32 {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        self.elapsed += delta;
        delta
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

#[derive(Debug, Clone)]
pub enum TrackValues {
    Translation(Vec<Vector3<f32>>),
    Rotation(Vec<UnitQuaternion<f32>>),
    Scale(Vec<Vector3<f32>>),
}

impl TrackValues {
    fn len(&self) -> usize {
        match self {
            TrackValues::Translation(v) | TrackValues::Scale(v) => v.len(),
            TrackValues::Rotation(q) => q.len(),
        }
    }
}

/// Keyframes for one property of one node
#[derive(Debug, Clone)]
pub struct Track {
    pub node: NodeId,
    pub times: Vec<f32>,
    pub values: TrackValues,
    pub interpolation: Interpolation,
}

impl Track {
    /// Keyframe pair surrounding `time` and the blend factor between them
    fn locate(&self, time: f32) -> Option<(usize, usize, f32)> {
        let count = self.times.len().min(self.values.len());
        if count == 0 {
            return None;
        }
        if time <= self.times[0] || count == 1 {
            return Some((0, 0, 0.0));
        }
        if time >= self.times[count - 1] {
            return Some((count - 1, count - 1, 0.0));
        }

        let next = self.times[..count].partition_point(|&t| t <= time);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        let factor = match self.interpolation {
            Interpolation::Step => 0.0,
            Interpolation::Linear if span > 0.0 => (time - self.times[prev]) / span,
            Interpolation::Linear => 0.0,
        };
        Some((prev, next, factor))
    }

    /// Write the sampled value at `time` into the target node
    pub fn apply(&self, time: f32, scene: &mut SceneGraph) {
        let Some((a, b, t)) = self.locate(time) else {
            return;
        };
        let Some(node) = scene.node_mut(self.node) else {
            return;
        };

        match &self.values {
            TrackValues::Translation(values) => {
                node.transform.translation = values[a].lerp(&values[b], t);
            }
            TrackValues::Scale(values) => {
                node.transform.scale = values[a].lerp(&values[b], t);
            }
            TrackValues::Rotation(values) => {
                let rotation = values[a].try_slerp(&values[b], t, 1e-6).unwrap_or(values[a]);
                node.transform.rotation = RotationState::from_quaternion(&rotation);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: Option<String>,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Last keyframe time across all tracks
    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .filter_map(|track| track.times.last().copied())
            .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Multiplier applied to every frame delta
    pub time_scale: f32,
    /// Start every clip in the asset as soon as it is loaded
    pub autoplay: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_scale: 0.8,
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Action {
    clip: AnimationClip,
    duration: f32,
    time: f32,
    playing: bool,
}

/// Plays clips in a loop and writes their values into the scene
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    actions: Vec<Action>,
    pub time_scale: f32,
}

impl AnimationMixer {
    pub fn new(time_scale: f32) -> Self {
        Self {
            actions: Vec::new(),
            time_scale,
        }
    }

    /// Register a clip; returns its action index
    pub fn add_clip(&mut self, clip: AnimationClip, playing: bool) -> usize {
        let duration = clip.duration();
        self.actions.push(Action {
            clip,
            duration,
            time: 0.0,
            playing,
        });
        self.actions.len() - 1
    }

    pub fn play(&mut self, action: usize) {
        if let Some(action) = self.actions.get_mut(action) {
            action.playing = true;
        }
    }

    pub fn action_time(&self, action: usize) -> Option<f32> {
        self.actions.get(action).map(|action| action.time)
    }

    /// Advance playing actions by `delta * time_scale` seconds
    pub fn update(&mut self, delta: f32, scene: &mut SceneGraph) {
        let step = delta * self.time_scale;
        for action in self.actions.iter_mut().filter(|action| action.playing) {
            action.time += step;
            if action.duration > 0.0 {
                action.time = action.time.rem_euclid(action.duration);
            } else {
                action.time = 0.0;
            }
            for track in &action.clip.tracks {
                track.apply(action.time, scene);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;
    use std::time::Duration;

    fn slide_clip(node: NodeId) -> AnimationClip {
        AnimationClip {
            name: Some("slide".to_string()),
            tracks: vec![Track {
                node,
                times: vec![0.0, 2.0],
                values: TrackValues::Translation(vec![Vector3::zeros(), Vector3::new(4.0, 0.0, 0.0)]),
                interpolation: Interpolation::Linear,
            }],
        }
    }

    #[test]
    fn test_clock_delta() {
        let mut clock = Clock::new();
        let start = Instant::now();
        assert_eq!(clock.delta_at(start), 0.0);
        let delta = clock.delta_at(start + Duration::from_millis(500));
        assert!((delta - 0.5).abs() < 1e-4);
        assert!((clock.elapsed() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_mixer_applies_time_scale() {
        let mut scene = SceneGraph::new();
        let node = scene.add_root(Node::new("slider"));
        let mut mixer = AnimationMixer::new(0.8);
        let action = mixer.add_clip(slide_clip(node), true);

        mixer.update(1.0, &mut scene);
        assert!((mixer.action_time(action).unwrap() - 0.8).abs() < 1e-5);
        let x = scene.node(node).unwrap().transform.translation.x;
        assert!((x - 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_mixer_loops() {
        let mut scene = SceneGraph::new();
        let node = scene.add_root(Node::new("slider"));
        let mut mixer = AnimationMixer::new(1.0);
        let action = mixer.add_clip(slide_clip(node), true);

        mixer.update(2.5, &mut scene);
        assert!((mixer.action_time(action).unwrap() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_stopped_action_does_not_move() {
        let mut scene = SceneGraph::new();
        let node = scene.add_root(Node::new("slider"));
        let mut mixer = AnimationMixer::new(1.0);
        let action = mixer.add_clip(slide_clip(node), false);
        mixer.update(1.0, &mut scene);
        assert_eq!(scene.node(node).unwrap().transform.translation.x, 0.0);

        mixer.play(action);
        mixer.update(1.0, &mut scene);
        assert!((scene.node(node).unwrap().transform.translation.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_and_rotation_tracks() {
        let mut scene = SceneGraph::new();
        let node = scene.add_root(Node::new("spinner"));
        let track = Track {
            node,
            times: vec![0.0, 1.0],
            values: TrackValues::Rotation(vec![
                UnitQuaternion::identity(),
                UnitQuaternion::from_euler_angles(1.0, 0.0, 0.0),
            ]),
            interpolation: Interpolation::Step,
        };
        track.apply(0.9, &mut scene);
        assert_eq!(scene.node(node).unwrap().transform.rotation.x, 0.0);
        track.apply(1.0, &mut scene);
        assert!((scene.node(node).unwrap().transform.rotation.x - 1.0).abs() < 1e-5);
    }
}
