//! Wand-Geometrie aus geschlossenen 2D-Grundrissen.
//!
//! Der Grundriss wird in der XY-Ebene entlang +Z extrudiert. Die Wall-Variante
//! verwirft anschließend alle Dreiecke mit nahezu horizontaler Normale
//! (|n.z| >= 0.999) — übrig bleiben die nahezu vertikalen Seitenflächen.
//! Die volle Extrusion inklusive Kappen dient als Depth-Prepass-Mesh.

use super::mesh::MeshData;
use glam::Vec2;

/// Schwellwert für das Kappen-Culling: Dreiecke mit |n.z| über dieser
/// Grenze gelten als Deckel/Boden und werden verworfen.
const CAP_NORMAL_LIMIT: f32 = 0.999;

/// Signierte Fläche eines Polygons (positiv = CCW).
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Trianguliert ein einfaches Polygon per Ear-Clipping.
///
/// Akzeptiert CW- und CCW-Eingabe; die Ausgabe-Indizes beziehen sich auf die
/// Eingabe-Reihenfolge und sind CCW gewickelt. Kollineare Punkte erzeugen
/// degenerierte Ohren, die übersprungen werden.
pub fn triangulate(points: &[Vec2]) -> Vec<u32> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    // Arbeitsliste in CCW-Reihenfolge
    let mut remaining: Vec<u32> = if signed_area(points) >= 0.0 {
        (0..n as u32).collect()
    } else {
        (0..n as u32).rev().collect()
    };

    let mut indices = Vec::with_capacity((n - 2) * 3);

    'outer: while remaining.len() > 3 {
        let m = remaining.len();
        for i in 0..m {
            let i_prev = remaining[(i + m - 1) % m];
            let i_curr = remaining[i];
            let i_next = remaining[(i + 1) % m];

            let a = points[i_prev as usize];
            let b = points[i_curr as usize];
            let c = points[i_next as usize];

            // Konvexe Ecke?
            let cross = (b - a).perp_dot(c - b);
            if cross <= 0.0 {
                continue;
            }

            // Kein anderer Punkt im Ohr-Dreieck?
            let mut is_ear = true;
            for &j in &remaining {
                if j == i_prev || j == i_curr || j == i_next {
                    continue;
                }
                if point_in_triangle(points[j as usize], a, b, c) {
                    is_ear = false;
                    break;
                }
            }
            if !is_ear {
                continue;
            }

            indices.extend_from_slice(&[i_prev, i_curr, i_next]);
            remaining.remove(i);
            continue 'outer;
        }

        // Kein Ohr gefunden (degeneriertes Polygon): erste Ecke abschneiden,
        // damit die Schleife terminiert
        indices.extend_from_slice(&[remaining[0], remaining[1], remaining[2]]);
        remaining.remove(1);
    }

    if remaining.len() == 3 {
        indices.extend_from_slice(&[remaining[0], remaining[1], remaining[2]]);
    }

    indices
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Extrudiert einen geschlossenen Grundriss entlang +Z zu einem Prisma.
///
/// Enthält Boden- und Deckelkappe (Ear-Clipping) plus ein Quad pro Kante.
/// Ein doppelter Schlusspunkt (`last == first`) wird verworfen.
pub fn extrude_polygon(points: &[Vec2], height: f32) -> MeshData {
    let mut points = points;
    if points.len() >= 2 && points[0] == points[points.len() - 1] {
        points = &points[..points.len() - 1];
    }
    let n = points.len();
    if n < 3 {
        return MeshData::new();
    }

    let mut mesh = MeshData::new();

    // Vertices: erst Boden (z=0), dann Deckel (z=height)
    for p in points {
        mesh.positions.push([p.x, p.y, 0.0]);
    }
    for p in points {
        mesh.positions.push([p.x, p.y, height]);
    }

    // Kappen: Deckel CCW (Normale +z), Boden gespiegelt (Normale -z)
    let cap = triangulate(points);
    for tri in cap.chunks_exact(3) {
        mesh.indices
            .extend_from_slice(&[tri[0], tri[2], tri[1]]);
    }
    for tri in cap.chunks_exact(3) {
        mesh.indices.extend_from_slice(&[
            tri[0] + n as u32,
            tri[1] + n as u32,
            tri[2] + n as u32,
        ]);
    }

    // Seitenflächen: zwei Dreiecke pro Kante
    for i in 0..n as u32 {
        let j = (i + 1) % n as u32;
        let (b0, b1) = (i, j);
        let (t0, t1) = (i + n as u32, j + n as u32);
        mesh.indices.extend_from_slice(&[b0, b1, t1]);
        mesh.indices.extend_from_slice(&[b0, t1, t0]);
    }

    mesh
}

/// Wand-Variante der Extrusion: volle Extrusion, danach werden alle Dreiecke
/// mit nahezu horizontaler Normale (Kappen) aus dem Index entfernt.
pub fn walls_from_polygon(points: &[Vec2], height: f32) -> MeshData {
    let mut mesh = extrude_polygon(points, height);

    let mut kept = Vec::with_capacity(mesh.indices.len());
    for tri in 0..mesh.triangle_count() {
        let normal = mesh.triangle_normal(tri);
        if normal.z.abs() < CAP_NORMAL_LIMIT {
            let i = tri * 3;
            kept.extend_from_slice(&mesh.indices[i..i + 3]);
        }
    }

    mesh.indices = kept;
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(-0.5, 0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5, -0.5),
        ]
    }

    fn l_shape() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_triangulate_square() {
        let tris = triangulate(&square());
        assert_eq!(tris.len(), 6); // n-2 = 2 Dreiecke
    }

    #[test]
    fn test_triangulate_concave() {
        let tris = triangulate(&l_shape());
        assert_eq!(tris.len() / 3, l_shape().len() - 2);
    }

    #[test]
    fn test_triangulate_cw_input() {
        let mut pts = square();
        pts.reverse(); // CW
        let tris = triangulate(&pts);
        assert_eq!(tris.len(), 6);
    }

    #[test]
    fn test_extrude_square_counts() {
        let mesh = extrude_polygon(&square(), 1.0);
        assert_eq!(mesh.positions.len(), 8);
        // 2 Kappen à 2 Dreiecke + 4 Kanten à 2 Dreiecke
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_extrude_drops_duplicate_closing_point() {
        let mut pts = square();
        pts.push(pts[0]);
        let mesh = extrude_polygon(&pts, 1.0);
        assert_eq!(mesh.positions.len(), 8);
    }

    #[test]
    fn test_walls_cull_caps() {
        let mesh = walls_from_polygon(&square(), 1.0);
        // Nur die 8 Seiten-Dreiecke bleiben übrig
        assert_eq!(mesh.triangle_count(), 8);
        for tri in 0..mesh.triangle_count() {
            let n = mesh.triangle_normal(tri);
            assert!(n.z.abs() < 0.999, "Kappen-Dreieck überlebte Culling");
        }
    }

    #[test]
    fn test_walls_keep_concave_sides() {
        let pts = l_shape();
        let mesh = walls_from_polygon(&pts, 2.0);
        // Eine Seitenfläche (2 Dreiecke) pro Kante
        assert_eq!(mesh.triangle_count(), pts.len() * 2);
    }

    #[test]
    fn test_too_few_points_is_empty() {
        let mesh = extrude_polygon(&[Vec2::ZERO, Vec2::ONE], 1.0);
        assert!(mesh.is_empty());
    }
}
