//! Trilinear LUT sampling.

use crate::image_pipeline::lut::types::Lut3D;

impl Lut3D {
    /// Remaps `rgb` through the table with trilinear interpolation.
    ///
    /// Coordinates go through the half-texel correction a GPU 3D texture
    /// lookup uses (`rgb * (n-1)/n + 0.5/n`) and clamp to the edge texels.
    /// Call [`Lut3D::validate`] first; sampling assumes a complete grid.
    pub fn sample(&self, rgb: [f32; 3]) -> [f32; 3] {
        let s = self.size;
        if s == 1 {
            return self.entry(0, 0, 0);
        }

        let n = s as f32;
        let scale = (n - 1.0) / n;
        let offset = 0.5 / n;
        let max_index = (s - 1) as f32;

        let mut coords = [0.0f32; 3];
        for c in 0..3 {
            let tex = rgb[c] * scale + offset;
            let texel = (tex * n - 0.5).clamp(0.0, max_index);
            coords[c] = if texel.is_nan() { 0.0 } else { texel };
        }

        let r0 = (coords[0] as usize).min(s - 2);
        let g0 = (coords[1] as usize).min(s - 2);
        let b0 = (coords[2] as usize).min(s - 2);
        let (r1, g1, b1) = (r0 + 1, g0 + 1, b0 + 1);
        let fr = coords[0] - r0 as f32;
        let fg = coords[1] - g0 as f32;
        let fb = coords[2] - b0 as f32;

        let c000 = self.entry(r0, g0, b0);
        let c100 = self.entry(r1, g0, b0);
        let c010 = self.entry(r0, g1, b0);
        let c110 = self.entry(r1, g1, b0);
        let c001 = self.entry(r0, g0, b1);
        let c101 = self.entry(r1, g0, b1);
        let c011 = self.entry(r0, g1, b1);
        let c111 = self.entry(r1, g1, b1);

        let mut out = [0.0f32; 3];
        for c in 0..3 {
            let c00 = c000[c] * (1.0 - fr) + c100[c] * fr;
            let c10 = c010[c] * (1.0 - fr) + c110[c] * fr;
            let c01 = c001[c] * (1.0 - fr) + c101[c] * fr;
            let c11 = c011[c] * (1.0 - fr) + c111[c] * fr;
            let c0 = c00 * (1.0 - fg) + c10 * fg;
            let c1 = c01 * (1.0 - fg) + c11 * fg;
            out[c] = c0 * (1.0 - fb) + c1 * fb;
        }
        out
    }
}
