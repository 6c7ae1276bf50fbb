use std::fmt;

use glam::{Mat4, Vec3};

pub const A: Vec3 = Vec3::new(3.0, 5.0, 7.0);
pub const B: Vec3 = Vec3::new(2.0, 4.0, 6.0);

pub const SCALE: f32 = 2.0;
pub const ROTATION_Y_DEGREES: f32 = 45.0;

/// Every value the demo prints, computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticReport {
    pub sum: Vec3,
    pub difference: Vec3,
    pub dot: f32,
    pub cross: Vec3,

    pub identity: Mat4,
    pub scale: Mat4,
    pub rotation_y: Mat4,
    /// Scale first, then rotation.
    pub combined: Mat4,
    /// `A` transformed as a point by `combined`.
    pub transformed: Vec3,
}

impl ArithmeticReport {
    pub fn compute() -> Self {
        let identity = Mat4::IDENTITY;
        let scale = Mat4::from_scale(Vec3::splat(SCALE));
        let rotation_y = Mat4::from_rotation_y(ROTATION_Y_DEGREES.to_radians());
        let combined = rotation_y * scale;

        Self {
            sum: A + B,
            difference: A - B,
            dot: A.dot(B),
            cross: A.cross(B),

            identity,
            scale,
            rotation_y,
            combined,
            transformed: combined.transform_point3(A),
        }
    }
}

/// Prints a matrix in row-vector layout: line `i` is glam's column `i`, so
/// the translation sits on the last line and rotations read as `v * M`.
struct Rows<'a>(&'a Mat4);

impl fmt::Display for Rows<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..4 {
            let r = self.0.col(i);
            writeln!(f, "  ({:>9.5}, {:>9.5}, {:>9.5}, {:>9.5})", r.x, r.y, r.z, r.w)?;
        }
        Ok(())
    }
}

fn vec3(v: Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

impl fmt::Display for ArithmeticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vector Operation Results")?;
        writeln!(f, "Addition: {}", vec3(self.sum))?;
        writeln!(f, "Subtraction: {}", vec3(self.difference))?;
        writeln!(f, "Dot: {}", self.dot)?;
        writeln!(f, "Cross: {}", vec3(self.cross))?;

        writeln!(f, "Matrix Operation Results")?;
        write!(f, "Identity:\n{}", Rows(&self.identity))?;
        write!(f, "Scale:\n{}", Rows(&self.scale))?;
        write!(f, "Rotation on Y axis:\n{}", Rows(&self.rotation_y))?;
        write!(f, "Multiplication:\n{}", Rows(&self.combined))?;
        writeln!(
            f,
            "Applying matrix to vector: ({:.5}, {:.5}, {:.5})",
            self.transformed.x, self.transformed.y, self.transformed.z
        )
    }
}
