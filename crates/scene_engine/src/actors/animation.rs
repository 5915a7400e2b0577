//! Keyframe animation for mesh actors
//!
//! A clip holds one track per animated node. Tracks are sampled by linear
//! interpolation of position and scale and spherical interpolation of
//! rotation. Playback loops: advancing past the end wraps around.

use crate::foundation::math::{utils, Quat, Transform, Unit, Vec3};
use crate::scene::{ObjectArena, ObjectId};

/// Node pose at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub transform: Transform,
}

/// Keyframes for a single node, sorted by time
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    pub target: ObjectId,
    keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    pub fn new(target: ObjectId, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { target, keyframes }
    }

    /// Pose at `time`, clamped to the first and last keyframes
    pub fn sample(&self, time: f32) -> Option<Transform> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        if time <= first.time {
            return Some(first.transform.clone());
        }
        if time >= last.time {
            return Some(last.transform.clone());
        }

        let next = self.keyframes.iter().position(|key| key.time > time)?;
        let (a, b) = (&self.keyframes[next - 1], &self.keyframes[next]);
        let span = b.time - a.time;
        let t = if span > f32::EPSILON { (time - a.time) / span } else { 0.0 };

        Some(Transform {
            position: lerp_vec(&a.transform.position, &b.transform.position, t),
            rotation: a.transform.rotation.slerp(&b.transform.rotation, t),
            scale: lerp_vec(&a.transform.scale, &b.transform.scale, t),
        })
    }

    fn end_time(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |key| key.time)
    }
}

fn lerp_vec(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
    Vec3::new(utils::lerp(a.x, b.x, t), utils::lerp(a.y, b.y, t), utils::lerp(a.z, b.z, t))
}

/// A named set of tracks
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub tracks: Vec<AnimationTrack>,
    pub duration: f32,
}

impl AnimationClip {
    /// Clip whose duration is the last keyframe of any track
    pub fn new(name: impl Into<String>, tracks: Vec<AnimationTrack>) -> Self {
        let duration = tracks.iter().map(AnimationTrack::end_time).fold(0.0, f32::max);
        Self {
            name: name.into(),
            tracks,
            duration,
        }
    }

    /// Two-keyframe rotation about an axis starting from `base`, e.g. a hinged panel opening
    pub fn hinge(target: ObjectId, base: &Transform, axis: &Vec3, angle: f32, duration: f32) -> Self {
        let turn = Unit::try_new(*axis, f32::EPSILON)
            .map_or_else(Quat::identity, |axis| Quat::from_axis_angle(&axis, angle));
        let opened = Transform {
            rotation: base.rotation * turn,
            ..base.clone()
        };
        let track = AnimationTrack::new(
            target,
            vec![
                Keyframe { time: 0.0, transform: base.clone() },
                Keyframe { time: duration, transform: opened },
            ],
        );
        Self::new("hinge", vec![track])
    }
}

/// Plays one clip in a loop
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    clip: AnimationClip,
    time: f32,
}

impl AnimationMixer {
    pub fn new(clip: AnimationClip) -> Self {
        Self { clip, time: 0.0 }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Advance playback by `delta` seconds (negative plays backwards) and pose the targets
    pub fn update(&mut self, delta: f32, objects: &mut ObjectArena) {
        self.time = if self.clip.duration > 0.0 {
            (self.time + delta).rem_euclid(self.clip.duration)
        } else {
            0.0
        };

        for track in &self.clip.tracks {
            let Some(pose) = track.sample(self.time) else {
                continue;
            };
            if let Some(node) = objects.get_mut(track.target) {
                node.transform = pose;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use crate::render::Material;
    use crate::scene::SceneNode;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_interpolates_between_keys() {
        let mut arena = ObjectArena::new();
        let id = arena.insert(SceneNode::group("panel"));
        let track = AnimationTrack::new(
            id,
            vec![
                Keyframe { time: 2.0, transform: Transform::from_position(Vec3::new(2.0, 0.0, 0.0)) },
                Keyframe { time: 0.0, transform: Transform::identity() },
            ],
        );

        let mid = track.sample(1.0).unwrap();
        assert_relative_eq!(mid.position, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(track.sample(5.0).unwrap().position.x, 2.0);
        assert_relative_eq!(track.sample(-1.0).unwrap().position.x, 0.0);
    }

    #[test]
    fn test_mixer_loops_and_poses_target() {
        let mut arena = ObjectArena::new();
        let panel = arena.insert(SceneNode::mesh("panel", Material::new()).with_position(Vec3::new(0.0, 3.0, 0.0)));
        let base = arena.get(panel).unwrap().transform.clone();
        let mut mixer = AnimationMixer::new(AnimationClip::hinge(panel, &base, &Vec3::x(), PI * 0.5, 1.0));

        mixer.update(0.5, &mut arena);
        let pose = &arena.get(panel).unwrap().transform;
        assert_relative_eq!(pose.rotation.angle(), PI * 0.25, epsilon = 1e-5);
        assert_relative_eq!(pose.position.y, 3.0);

        mixer.update(0.75, &mut arena);
        assert_relative_eq!(mixer.time(), 0.25, epsilon = 1e-5);

        mixer.update(-0.5, &mut arena);
        assert_relative_eq!(mixer.time(), 0.75, epsilon = 1e-5);
    }
}
