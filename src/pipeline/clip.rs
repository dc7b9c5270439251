//! Clipping pre-passes
//!
//! The fill algorithms assert on out-of-bounds input by contract, and a
//! perspective divide behind the eye flips signs silently, so both draw
//! paths clip before they rasterize: against the near plane first (camera
//! space or homogeneous clip space), then against the viewport rectangle in
//! screen space. Sutherland-Hodgman, one plane at a time.

use super::Varying;
use nalgebra_glm as glm;

/// Margin used for the homogeneous near plane test
const NEAR_EPSILON: f32 = 1e-5;

/// Clip a polygon against one plane given a signed distance function
/// (>= 0 keeps the vertex) and an interpolator for the crossing point.
fn clip_plane<T: Copy>(
    poly: &[T],
    dist: impl Fn(&T) -> f32,
    lerp: impl Fn(&T, &T, f32) -> T,
) -> Vec<T> {
    let mut out = Vec::with_capacity(poly.len() + 1);
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        let da = dist(&a);
        let db = dist(&b);
        if da >= 0.0 {
            out.push(a);
            if db < 0.0 {
                out.push(lerp(&a, &b, da / (da - db)));
            }
        } else if db >= 0.0 {
            out.push(lerp(&a, &b, da / (da - db)));
        }
    }
    out
}

fn lerp_vec3(a: &glm::Vec3, b: &glm::Vec3, t: f32) -> glm::Vec3 {
    a + (b - a) * t
}

fn lerp_vec2(a: &glm::Vec2, b: &glm::Vec2, t: f32) -> glm::Vec2 {
    a + (b - a) * t
}

/// Clip a camera-space polygon against the near plane, keeping `z <= -near`
/// (the camera looks down -Z).
pub fn clip_polygon_near(poly: &[glm::Vec3], near: f32) -> Vec<glm::Vec3> {
    clip_plane(poly, |v| -v.z - near, lerp_vec3)
}

/// Clip a screen-space polygon to the closed viewport rectangle
/// `[0,width] x [0,height]`.
pub fn clip_polygon_rect(poly: &[glm::Vec2], width: f32, height: f32) -> Vec<glm::Vec2> {
    let clipped = clip_plane(poly, |v| v.x, lerp_vec2);
    let clipped = clip_plane(&clipped, |v| width - v.x, lerp_vec2);
    let clipped = clip_plane(&clipped, |v| v.y, lerp_vec2);
    clip_plane(&clipped, |v| height - v.y, lerp_vec2)
}

/// Clip a triangle in homogeneous clip space against the near plane
/// `z + w > 0`, carrying varyings through the crossing points. Returns up to
/// four vertices; fewer than three means the triangle is fully behind.
pub fn clip_triangle_homogeneous<V: Varying>(tri: &[(glm::Vec4, V); 3]) -> Vec<(glm::Vec4, V)> {
    clip_plane(
        tri,
        |(pos, _)| pos.z + pos.w - NEAR_EPSILON,
        |(pa, va), (pb, vb), t| (pa + (pb - pa) * t, V::lerp(va, vb, t)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_in_front_passes_through() {
        let poly = [
            glm::vec3(0.0, 0.0, -5.0),
            glm::vec3(1.0, 0.0, -5.0),
            glm::vec3(0.0, 1.0, -5.0),
        ];
        let clipped = clip_polygon_near(&poly, 0.1);
        assert_eq!(clipped.len(), 3);
    }

    #[test]
    fn polygon_behind_is_dropped() {
        let poly = [
            glm::vec3(0.0, 0.0, 1.0),
            glm::vec3(1.0, 0.0, 2.0),
            glm::vec3(0.0, 1.0, 1.5),
        ];
        assert!(clip_polygon_near(&poly, 0.1).is_empty());
    }

    #[test]
    fn straddling_polygon_lands_on_the_plane() {
        let near = 0.5;
        let poly = [
            glm::vec3(0.0, 0.0, -5.0),
            glm::vec3(2.0, 0.0, 1.0),
            glm::vec3(-2.0, 0.0, 1.0),
        ];
        let clipped = clip_polygon_near(&poly, near);
        assert!(clipped.len() >= 3);
        for v in &clipped {
            assert!(v.z <= -near + 1e-4, "vertex at z = {}", v.z);
        }
    }

    #[test]
    fn rect_clip_bounds_every_vertex() {
        let poly = [
            glm::vec2(-10.0, 5.0),
            glm::vec2(50.0, -8.0),
            glm::vec2(30.0, 40.0),
        ];
        let clipped = clip_polygon_rect(&poly, 32.0, 24.0);
        assert!(clipped.len() >= 3);
        for v in &clipped {
            assert!(v.x >= -1e-4 && v.x <= 32.0 + 1e-4);
            assert!(v.y >= -1e-4 && v.y <= 24.0 + 1e-4);
        }
    }

    #[test]
    fn rect_clip_keeps_interior_polygon() {
        let poly = [
            glm::vec2(1.0, 1.0),
            glm::vec2(10.0, 2.0),
            glm::vec2(5.0, 9.0),
        ];
        let clipped = clip_polygon_rect(&poly, 32.0, 24.0);
        assert_eq!(clipped.len(), 3);
    }

    #[test]
    fn homogeneous_clip_keeps_w_positive_side() {
        let tri = [
            (glm::vec4(0.0, 0.0, -1.0, 2.0), ()),
            (glm::vec4(1.0, 0.0, -3.0, 1.0), ()),
            (glm::vec4(0.0, 1.0, -1.0, 2.0), ()),
        ];
        let clipped = clip_triangle_homogeneous(&tri);
        assert!(clipped.len() >= 3);
        for (pos, _) in &clipped {
            assert!(pos.z + pos.w >= 0.0);
        }
    }
}
