//! Geometry engine: curve segments, arc-length parameterization, sub-path
//! extraction and stroke outlining.
//!
//! Every drawable command reduces to a [`Segment`]: straight lines stay
//! lines, quadratics are degree-elevated and elliptical arcs are
//! approximated by cubics. [`ArcLengthEngine`] measures one outline with
//! per-segment length tables, which is all the wall builder needs to turn
//! boundary points into offsets and offsets back into sub-paths.

use cavalier_contours::polyline::{
    PlineOffsetOptions, PlineSource, PlineSourceMut, PlineVertex, Polyline,
};
use glam::{DVec2, dvec2};

use crate::path::{Command, EPSILON, Path};
use crate::types::BBox;

/// Length-table resolution for curved segments
const TABLE_STEPS: usize = 64;

/// How far (in user units) a point may sit from the outline and still count as on it
pub const ON_OUTLINE_TOLERANCE: f64 = 1e-3;

// ============================================================================
// Segments
// ============================================================================

/// A single drawable piece of an outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(DVec2, DVec2),
    Cubic([DVec2; 4]),
}

impl Segment {
    /// Degree-elevate a quadratic Bezier to the equivalent cubic.
    pub fn from_quad(p0: DVec2, c: DVec2, p2: DVec2) -> Segment {
        Segment::Cubic([
            p0,
            p0 + (c - p0) * (2.0 / 3.0),
            p2 + (c - p2) * (2.0 / 3.0),
            p2,
        ])
    }

    pub fn start(&self) -> DVec2 {
        match self {
            Segment::Line(a, _) => *a,
            Segment::Cubic(p) => p[0],
        }
    }

    pub fn end(&self) -> DVec2 {
        match self {
            Segment::Line(_, b) => *b,
            Segment::Cubic(p) => p[3],
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(self, Segment::Cubic(_))
    }

    pub fn point_at(&self, t: f64) -> DVec2 {
        match self {
            Segment::Line(a, b) => a.lerp(*b, t),
            Segment::Cubic([p0, p1, p2, p3]) => {
                let mt = 1.0 - t;
                *p0 * (mt * mt * mt)
                    + *p1 * (3.0 * mt * mt * t)
                    + *p2 * (3.0 * mt * t * t)
                    + *p3 * (t * t * t)
            }
        }
    }

    pub fn derivative(&self, t: f64) -> DVec2 {
        match self {
            Segment::Line(a, b) => *b - *a,
            Segment::Cubic([p0, p1, p2, p3]) => {
                let mt = 1.0 - t;
                ((*p1 - *p0) * (mt * mt) + (*p2 - *p1) * (2.0 * mt * t) + (*p3 - *p2) * (t * t))
                    * 3.0
            }
        }
    }

    /// Unit direction of travel leaving the start point.
    pub fn start_tangent(&self) -> DVec2 {
        match self {
            Segment::Line(a, b) => (*b - *a).normalize_or_zero(),
            Segment::Cubic([p0, p1, p2, p3]) => [*p1, *p2, *p3]
                .iter()
                .find(|p| p.distance(*p0) > EPSILON)
                .map(|p| (*p - *p0).normalize_or_zero())
                .unwrap_or(DVec2::ZERO),
        }
    }

    /// Unit direction of travel arriving at the end point.
    pub fn end_tangent(&self) -> DVec2 {
        match self {
            Segment::Line(a, b) => (*b - *a).normalize_or_zero(),
            Segment::Cubic([p0, p1, p2, p3]) => [*p2, *p1, *p0]
                .iter()
                .find(|p| p.distance(*p3) > EPSILON)
                .map(|p| (*p3 - *p).normalize_or_zero())
                .unwrap_or(DVec2::ZERO),
        }
    }

    /// Split at parameter `t` (de Casteljau).
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        match self {
            Segment::Line(a, b) => {
                let m = a.lerp(*b, t);
                (Segment::Line(*a, m), Segment::Line(m, *b))
            }
            Segment::Cubic([p0, p1, p2, p3]) => {
                let p01 = p0.lerp(*p1, t);
                let p12 = p1.lerp(*p2, t);
                let p23 = p2.lerp(*p3, t);
                let p012 = p01.lerp(p12, t);
                let p123 = p12.lerp(p23, t);
                let mid = p012.lerp(p123, t);
                (
                    Segment::Cubic([*p0, p01, p012, mid]),
                    Segment::Cubic([mid, p123, p23, *p3]),
                )
            }
        }
    }

    /// The piece between parameters `t0 < t1`.
    pub fn sub(&self, t0: f64, t1: f64) -> Segment {
        let (t0, t1) = (t0.clamp(0.0, 1.0), t1.clamp(0.0, 1.0));
        if let Segment::Line(a, b) = self {
            return Segment::Line(a.lerp(*b, t0), a.lerp(*b, t1));
        }
        let right = if t0 > 0.0 { self.split(t0).1 } else { *self };
        if t1 >= 1.0 {
            return right;
        }
        let span = 1.0 - t0;
        if span <= f64::EPSILON {
            let p = self.point_at(t0);
            return Segment::Line(p, p);
        }
        right.split((t1 - t0) / span).0
    }

    pub fn reversed(&self) -> Segment {
        match self {
            Segment::Line(a, b) => Segment::Line(*b, *a),
            Segment::Cubic([p0, p1, p2, p3]) => Segment::Cubic([*p3, *p2, *p1, *p0]),
        }
    }

    /// Tight bounding box, solving for the cubic's axis extrema.
    pub fn bounding_box(&self) -> BBox {
        let mut bbox = BBox::from_points([self.start(), self.end()]);
        if let Segment::Cubic([p0, p1, p2, p3]) = self {
            // derivative / 3 = a t^2 + b t + c, per axis
            let a = -*p0 + *p1 * 3.0 - *p2 * 3.0 + *p3;
            let b = (*p0 - *p1 * 2.0 + *p2) * 2.0;
            let c = *p1 - *p0;
            for axis in 0..2 {
                for t in quadratic_roots(a[axis], b[axis], c[axis]) {
                    if t > 0.0 && t < 1.0 {
                        bbox.include(self.point_at(t));
                    }
                }
            }
        }
        bbox
    }

    pub fn to_command(&self) -> Command {
        match self {
            Segment::Line(_, b) => Command::line_to(*b),
            Segment::Cubic([_, c1, c2, p3]) => Command::cubic_to(*c1, *c2, *p3),
        }
    }

    /// Parameter and distance of the point on this segment closest to `p`.
    fn nearest(&self, p: DVec2) -> (f64, f64) {
        match self {
            Segment::Line(a, b) => {
                let ab = *b - *a;
                let len2 = ab.length_squared();
                let t = if len2 > 0.0 {
                    ((p - *a).dot(ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                (t, a.lerp(*b, t).distance(p))
            }
            Segment::Cubic(_) => {
                const COARSE: usize = 48;
                let mut best = (0.0, f64::INFINITY);
                for i in 0..=COARSE {
                    let t = i as f64 / COARSE as f64;
                    let d = self.point_at(t).distance(p);
                    if d < best.1 {
                        best = (t, d);
                    }
                }
                // golden-section refinement within the neighbouring samples
                let step = 1.0 / COARSE as f64;
                let (mut lo, mut hi) = ((best.0 - step).max(0.0), (best.0 + step).min(1.0));
                let ratio = 0.618_033_988_749_895;
                for _ in 0..40 {
                    let m1 = hi - (hi - lo) * ratio;
                    let m2 = lo + (hi - lo) * ratio;
                    if self.point_at(m1).distance(p) < self.point_at(m2).distance(p) {
                        hi = m2;
                    } else {
                        lo = m1;
                    }
                }
                let t = (lo + hi) * 0.5;
                let d = self.point_at(t).distance(p);
                if d < best.1 { (t, d) } else { best }
            }
        }
    }
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    vec![(-b + sq) / (2.0 * a), (-b - sq) / (2.0 * a)]
}

// ============================================================================
// Elliptical arcs
// ============================================================================

/// Convert an SVG elliptical arc to cubic segments of at most 90 degrees each.
///
/// Radii too small to span the endpoints are scaled up uniformly; a zero
/// radius degrades the arc to a straight line.
pub fn arc_to_cubics(
    from: DVec2,
    radii: DVec2,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: DVec2,
) -> Vec<Segment> {
    if from.distance(to) < EPSILON {
        return Vec::new();
    }
    let (mut rx, mut ry) = (radii.x.abs(), radii.y.abs());
    if rx < EPSILON || ry < EPSILON {
        return vec![Segment::Line(from, to)];
    }

    let phi = rotation_deg.to_radians();
    let (sin, cos) = phi.sin_cos();
    let half = (from - to) * 0.5;
    let x1 = cos * half.x + sin * half.y;
    let y1 = -sin * half.x + cos * half.y;

    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
    let den = rx * rx * y1 * y1 + ry * ry * x1 * x1;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep {
        coef = -coef;
    }
    let cx1 = coef * rx * y1 / ry;
    let cy1 = -coef * ry * x1 / rx;
    let mid = (from + to) * 0.5;
    let center = dvec2(cos * cx1 - sin * cy1 + mid.x, sin * cx1 + cos * cy1 + mid.y);

    let angle = |u: DVec2, v: DVec2| (u.x * v.y - u.y * v.x).atan2(u.dot(v));
    let u = dvec2((x1 - cx1) / rx, (y1 - cy1) / ry);
    let v = dvec2((-x1 - cx1) / rx, (-y1 - cy1) / ry);
    let theta1 = angle(DVec2::X, u);
    let mut dtheta = angle(u, v);
    if !sweep && dtheta > 0.0 {
        dtheta -= std::f64::consts::TAU;
    } else if sweep && dtheta < 0.0 {
        dtheta += std::f64::consts::TAU;
    }

    let pieces = (dtheta.abs() / std::f64::consts::FRAC_PI_2).ceil().max(1.0) as usize;
    let delta = dtheta / pieces as f64;
    let k = 4.0 / 3.0 * (delta / 4.0).tan();
    let map = |x: f64, y: f64| center + dvec2(cos * rx * x - sin * ry * y, sin * rx * x + cos * ry * y);

    let mut out = Vec::with_capacity(pieces);
    for i in 0..pieces {
        let a1 = theta1 + delta * i as f64;
        let a2 = a1 + delta;
        let (s1, c1) = a1.sin_cos();
        let (s2, c2) = a2.sin_cos();
        let p0 = if i == 0 { from } else { map(c1, s1) };
        let p3 = if i + 1 == pieces { to } else { map(c2, s2) };
        out.push(Segment::Cubic([
            p0,
            map(c1 - k * s1, s1 + k * c1),
            map(c2 + k * s2, s2 - k * c2),
            p3,
        ]));
    }
    out
}

// ============================================================================
// Geometry engine
// ============================================================================

/// Arc-length operations over one outline (a single subpath).
///
/// Offsets are distances along the outline from its first point.
pub trait GeometryEngine {
    /// Total length of the outline.
    fn length(&self) -> f64;

    /// The point at `offset`.
    fn point_at(&self, offset: f64) -> DVec2;

    /// The offset of a point lying on the outline, or `None` when the point
    /// is further than [`ON_OUTLINE_TOLERANCE`] from it.
    fn offset_of(&self, point: DVec2) -> Option<f64>;

    /// The closest outline point to `point`, with its offset.
    fn nearest_point(&self, point: DVec2) -> Option<(DVec2, f64)>;

    /// The parts before and after `offset`; either may be empty.
    fn split_at(&self, offset: f64) -> (Path, Path);

    /// The run from `from` to `to` in travel direction, wrapping past the
    /// origin of a closed outline when `from > to`.
    fn sub_path(&self, from: f64, to: f64) -> Option<Path>;

    /// A closed outline of the stroke of the given width centered on this
    /// outline: one ring for an open outline, outer and inner rings for a
    /// closed one.
    fn offset_stroke(&self, width: f64) -> Option<Path>;
}

#[derive(Debug, Clone)]
struct Measured {
    segment: Segment,
    /// Offset of the segment start along the outline
    start: f64,
    length: f64,
    /// Cumulative length at evenly spaced parameters
    table: Vec<f64>,
}

impl Measured {
    fn new(segment: Segment, start: f64) -> Self {
        let steps = if segment.is_curve() { TABLE_STEPS } else { 1 };
        let mut table = Vec::with_capacity(steps + 1);
        table.push(0.0);
        let mut prev = segment.start();
        let mut acc = 0.0;
        for i in 1..=steps {
            let p = segment.point_at(i as f64 / steps as f64);
            acc += prev.distance(p);
            table.push(acc);
            prev = p;
        }
        Self {
            segment,
            start,
            length: acc,
            table,
        }
    }

    fn end(&self) -> f64 {
        self.start + self.length
    }

    fn steps(&self) -> usize {
        self.table.len() - 1
    }

    fn length_at(&self, t: f64) -> f64 {
        let steps = self.steps();
        let x = t.clamp(0.0, 1.0) * steps as f64;
        let i = (x.floor() as usize).min(steps - 1);
        let frac = x - i as f64;
        self.table[i] + (self.table[i + 1] - self.table[i]) * frac
    }

    fn t_at(&self, len: f64) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        let len = len.clamp(0.0, self.length);
        let i = self.table.partition_point(|&v| v < len).clamp(1, self.steps());
        let (lo, hi) = (self.table[i - 1], self.table[i]);
        let frac = if hi > lo { (len - lo) / (hi - lo) } else { 0.0 };
        ((i - 1) as f64 + frac) / self.steps() as f64
    }
}

/// [`GeometryEngine`] backed by sampled arc-length tables.
#[derive(Debug, Clone)]
pub struct ArcLengthEngine {
    parts: Vec<Measured>,
    total: f64,
    closed: bool,
}

impl ArcLengthEngine {
    pub fn new(path: &Path) -> Self {
        let mut parts = Vec::new();
        let mut total = 0.0;
        for segment in path.segments() {
            let part = Measured::new(segment, total);
            if part.length <= 1e-12 {
                continue;
            }
            total = part.end();
            parts.push(part);
        }
        Self {
            parts,
            total,
            closed: path.is_closed(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The non-degenerate segments of the outline, in order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.parts.iter().map(|p| &p.segment)
    }

    /// Offset at which each segment starts.
    pub fn segment_offsets(&self) -> impl Iterator<Item = f64> + '_ {
        self.parts.iter().map(|p| p.start)
    }

    /// Points spaced evenly by arc length (at least `count` of them) plus
    /// every segment junction, ordered by offset.
    pub fn samples(&self, count: usize) -> Vec<(DVec2, f64)> {
        let mut out = Vec::with_capacity(count + self.parts.len() + 1);
        if self.parts.is_empty() {
            return out;
        }
        let count = count.max(1);
        for i in 0..=count {
            let offset = self.total * i as f64 / count as f64;
            out.push((self.point_at(offset), offset));
        }
        for part in &self.parts {
            out.push((part.segment.start(), part.start));
        }
        out.sort_by(|a, b| a.1.total_cmp(&b.1));
        out
    }

    fn locate(&self, offset: f64) -> Option<(&Measured, f64)> {
        let offset = offset.clamp(0.0, self.total);
        let i = self
            .parts
            .partition_point(|p| p.end() < offset)
            .min(self.parts.len().checked_sub(1)?);
        let part = &self.parts[i];
        Some((part, part.t_at(offset - part.start)))
    }

    /// Segments covering `[a, b]`, `a <= b`.
    fn collect(&self, a: f64, b: f64, out: &mut Vec<Segment>) {
        for part in &self.parts {
            if part.end() <= a + EPSILON || part.start >= b - EPSILON {
                continue;
            }
            let t0 = if a > part.start { part.t_at(a - part.start) } else { 0.0 };
            let t1 = if b < part.end() { part.t_at(b - part.start) } else { 1.0 };
            if t1 - t0 <= 1e-12 {
                continue;
            }
            out.push(part.segment.sub(t0, t1));
        }
    }

    fn build(pieces: &[Segment]) -> Option<Path> {
        let first = pieces.first()?;
        let mut commands = Vec::with_capacity(pieces.len() + 1);
        commands.push(Command::move_to(first.start()));
        commands.extend(pieces.iter().map(Segment::to_command));
        Some(Path::from_commands(commands))
    }

    /// The outline as a polyline, curves subdivided by length.
    fn flatten(&self) -> Vec<DVec2> {
        let mut pts = Vec::new();
        let Some(first) = self.parts.first() else {
            return pts;
        };
        pts.push(first.segment.start());
        for part in &self.parts {
            match part.segment {
                Segment::Line(_, b) => pts.push(b),
                Segment::Cubic(_) => {
                    let n = ((part.length / 2.0).ceil() as usize).clamp(4, TABLE_STEPS);
                    for i in 1..=n {
                        pts.push(part.segment.point_at(i as f64 / n as f64));
                    }
                }
            }
        }
        pts.dedup_by(|a, b| a.distance(*b) < EPSILON);
        pts
    }
}

impl GeometryEngine for ArcLengthEngine {
    fn length(&self) -> f64 {
        self.total
    }

    fn point_at(&self, offset: f64) -> DVec2 {
        match self.locate(offset) {
            Some((part, t)) => part.segment.point_at(t),
            None => DVec2::ZERO,
        }
    }

    fn offset_of(&self, point: DVec2) -> Option<f64> {
        let (nearest, offset) = self.nearest_point(point)?;
        (nearest.distance(point) <= ON_OUTLINE_TOLERANCE).then_some(offset)
    }

    fn nearest_point(&self, point: DVec2) -> Option<(DVec2, f64)> {
        let mut best: Option<(f64, DVec2, f64)> = None;
        for part in &self.parts {
            let (t, d) = part.segment.nearest(point);
            if best.is_none_or(|(bd, _, _)| d < bd) {
                best = Some((d, part.segment.point_at(t), part.start + part.length_at(t)));
            }
        }
        best.map(|(_, p, offset)| (p, offset))
    }

    fn split_at(&self, offset: f64) -> (Path, Path) {
        let offset = offset.clamp(0.0, self.total);
        let mut before = Vec::new();
        let mut after = Vec::new();
        self.collect(0.0, offset, &mut before);
        self.collect(offset, self.total, &mut after);
        (
            Self::build(&before).unwrap_or_default(),
            Self::build(&after).unwrap_or_default(),
        )
    }

    fn sub_path(&self, from: f64, to: f64) -> Option<Path> {
        if self.total <= EPSILON {
            return None;
        }
        let from = from.clamp(0.0, self.total);
        let to = to.clamp(0.0, self.total);
        if (to - from).abs() <= EPSILON {
            return None;
        }
        let mut pieces = Vec::new();
        if from < to {
            self.collect(from, to, &mut pieces);
        } else if self.closed {
            self.collect(from, self.total, &mut pieces);
            self.collect(0.0, to, &mut pieces);
        } else {
            self.collect(to, from, &mut pieces);
            pieces = pieces.iter().rev().map(Segment::reversed).collect();
        }
        Self::build(&pieces)
    }

    fn offset_stroke(&self, width: f64) -> Option<Path> {
        let half = width / 2.0;
        if !(half > 0.0) || !half.is_finite() {
            return None;
        }
        let mut pts = self.flatten();
        if self.closed && pts.len() > 1 && pts[0].distance(pts[pts.len() - 1]) < EPSILON {
            pts.pop();
        }
        let min_points = if self.closed { 3 } else { 2 };
        if pts.len() < min_points {
            return None;
        }

        let mut center = if self.closed {
            Polyline::new_closed()
        } else {
            Polyline::new()
        };
        for p in &pts {
            center.add(p.x, p.y, 0.0);
        }
        let options = PlineOffsetOptions {
            handle_self_intersects: true,
            ..Default::default()
        };
        let left: Vec<Polyline<f64>> = center.parallel_offset_opt(half, &options);
        let right: Vec<Polyline<f64>> = center.parallel_offset_opt(-half, &options);

        if self.closed {
            // outer and inner loops, whichever side each came from
            let rings: Vec<Path> = left
                .iter()
                .chain(&right)
                .filter(|ring| ring.vertex_data.len() > 2)
                .map(|ring| Path::from_commands(ring_commands(ring)))
                .collect();
            return (!rings.is_empty()).then(|| Path::join(rings));
        }

        // an open stroke is one ring: down the left side, across the butt
        // cap, back up the right side
        let ([left], [right]) = (left.as_slice(), right.as_slice()) else {
            return None;
        };
        let mut right = right.clone();
        right.invert_direction_mut();
        let mut commands = pline_commands(left);
        let start = commands.first()?.to;
        commands.extend(pline_commands(&right).into_iter().enumerate().map(
            |(i, command)| match i {
                0 => Command::line_to(command.to),
                _ => command,
            },
        ));
        commands.push(Command::line_to(start));
        commands.push(Command::close(start));
        Some(Path::from_commands(commands))
    }
}

/// Move to the first vertex, then one command per segment of an open
/// polyline.
fn pline_commands(pline: &Polyline<f64>) -> Vec<Command> {
    let verts = &pline.vertex_data;
    let Some(first) = verts.first() else {
        return Vec::new();
    };
    let mut commands = Vec::with_capacity(verts.len());
    commands.push(Command::move_to(dvec2(first.x, first.y)));
    for pair in verts.windows(2) {
        commands.push(bulge_command(pair[0], dvec2(pair[1].x, pair[1].y)));
    }
    commands
}

/// Like [`pline_commands`], plus the segment back to the first vertex and
/// a close.
fn ring_commands(pline: &Polyline<f64>) -> Vec<Command> {
    let mut commands = pline_commands(pline);
    if let (Some(first), Some(last)) = (pline.vertex_data.first(), pline.vertex_data.last()) {
        let origin = dvec2(first.x, first.y);
        commands.push(bulge_command(*last, origin));
        commands.push(Command::close(origin));
    }
    commands
}

/// The segment leaving `vertex` for `to`. A bulge is `tan(θ/4)` of the arc's
/// sweep `θ`, positive for increasing angle.
fn bulge_command(vertex: PlineVertex<f64>, to: DVec2) -> Command {
    let from = dvec2(vertex.x, vertex.y);
    let sweep = 4.0 * vertex.bulge.atan();
    let half_sin = (sweep / 2.0).sin().abs();
    if vertex.bulge.abs() < 1e-12 || half_sin < 1e-12 {
        return Command::line_to(to);
    }
    let radius = from.distance(to) / (2.0 * half_sin);
    Command::arc_to(
        DVec2::splat(radius),
        0.0,
        sweep.abs() > std::f64::consts::PI,
        vertex.bulge > 0.0,
        to,
    )
}
