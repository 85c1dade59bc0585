//! Render Statistics

use std::ops::AddAssign;

/// Per thread counters. Workers own one each; they are summed once per
/// iteration and reported through the log.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Light subpaths traced.
    pub light_paths: u64,

    /// Light vertices stored for connections and merging.
    pub light_vertices: u64,

    /// Eye subpath vertices processed.
    pub eye_vertices: u64,

    /// Shadow rays traced.
    pub shadow_rays: u64,

    /// Light vertices returned by merge queries before the distance test.
    pub merge_candidates: u64,

    /// Light vertices merged with an eye vertex.
    pub merges: u64,

    /// Contributions and subpaths dropped because of NaN or infinite values.
    pub discarded: u64,

    /// Longest light subpath in segments.
    pub max_light_path_length: u64,
}

impl RenderStats {
    /// Logs the counters.
    ///
    /// * `label` - Prefix for the log line.
    pub fn report(&self, label: &str) {
        let merge_ratio = if self.merge_candidates > 0 {
            100.0 * self.merges as f64 / self.merge_candidates as f64
        } else {
            0.0
        };
        info!(
            "{label}: {} light paths, {} light vertices (longest {}), {} eye vertices, {} shadow rays, \
             {} merges ({merge_ratio:.1}% of candidates), {} discarded",
            self.light_paths,
            self.light_vertices,
            self.max_light_path_length,
            self.eye_vertices,
            self.shadow_rays,
            self.merges,
            self.discarded,
        );
        if self.discarded > 0 {
            warn!("{label}: {} non-finite contributions were dropped", self.discarded);
        }
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.light_paths += other.light_paths;
        self.light_vertices += other.light_vertices;
        self.eye_vertices += other.eye_vertices;
        self.shadow_rays += other.shadow_rays;
        self.merge_candidates += other.merge_candidates;
        self.merges += other.merges;
        self.discarded += other.discarded;
        self.max_light_path_length = self.max_light_path_length.max(other.max_light_path_length);
    }
}
