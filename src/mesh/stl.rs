use super::{Mesh, Triangle};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a mesh's triangles (all submeshes) to a binary STL file
pub fn write_mesh_stl(path: &Path, mesh: &Mesh) -> Result<()> {
    write_stl(path, &mesh.triangles())
}

/// Write triangles to a binary STL file
///
/// Binary STL format:
/// - 80 byte header
/// - 4 byte u32 triangle count (little endian)
/// - For each triangle:
///   - 3 x f32 normal (12 bytes)
///   - 3 x 3 x f32 vertices (36 bytes)
///   - 2 byte attribute (usually 0)
pub fn write_stl(path: &Path, triangles: &[Triangle]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_stl_to(&mut writer, triangles)?;
    writer.flush()?;
    Ok(())
}

/// Stream binary STL into any writer
pub fn write_stl_to<W: Write>(writer: &mut W, triangles: &[Triangle]) -> Result<()> {
    let mut header = [b' '; 80];
    let title = b"polyextrude - extruded polygon";
    header[..title.len()].copy_from_slice(title);
    writer.write_all(&header)?;

    let count = u32::try_from(triangles.len()).context("Too many triangles for STL")?;
    writer.write_all(&count.to_le_bytes())?;

    for tri in triangles {
        for &n in &tri.normal {
            writer.write_all(&n.to_le_bytes())?;
        }

        for vertex in &tri.vertices {
            for &coord in vertex {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }

        // Attribute byte count
        writer.write_all(&[0u8, 0u8])?;
    }

    Ok(())
}

/// Get the file size of an STL with the given number of triangles
pub fn estimate_stl_size(triangle_count: usize) -> usize {
    // 80 (header) + 4 (count) + triangles * (12 normal + 36 vertices + 2 attribute)
    80 + 4 + triangle_count * 50
}
