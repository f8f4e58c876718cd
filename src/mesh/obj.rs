use super::Mesh;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a mesh to a Wavefront OBJ file, one group per submesh
pub fn write_obj(path: &Path, mesh: &Mesh) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create OBJ file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_obj_to(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}

/// Stream OBJ text into any writer
///
/// Positions, UVs (when present) and normals share the vertex numbering, so
/// faces use `v/vt/vn` with the same index three times.
pub fn write_obj_to<W: Write>(writer: &mut W, mesh: &Mesh) -> Result<()> {
    writeln!(writer, "# polyextrude")?;
    writeln!(writer, "o {}", mesh.name)?;

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
    }
    for &(u, v) in &mesh.uvs {
        writeln!(writer, "vt {} {}", u, v)?;
    }
    for n in &mesh.normals {
        writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
    }

    let has_uvs = !mesh.uvs.is_empty();
    let has_normals = !mesh.normals.is_empty();

    for (group, indices) in mesh.submeshes.iter().enumerate() {
        writeln!(writer, "g {}_{}", mesh.name, group)?;
        for tri in indices.chunks_exact(3) {
            write!(writer, "f")?;
            for &i in tri {
                // OBJ indices are 1-based
                let i = i + 1;
                match (has_uvs, has_normals) {
                    (true, true) => write!(writer, " {i}/{i}/{i}")?,
                    (true, false) => write!(writer, " {i}/{i}")?,
                    (false, true) => write!(writer, " {i}//{i}")?,
                    (false, false) => write!(writer, " {i}")?,
                }
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}
