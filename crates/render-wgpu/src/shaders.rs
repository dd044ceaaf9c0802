/// WGSL shader for chunk meshes.
///
/// Positions and normals arrive as separate streams; the chunk origin comes
/// from a per-instance stream, one instance per draw.
pub const CHUNK_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    cam_pos: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) origin: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let world_pos = vertex.position + instance.origin;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world_pos, 1.0);
    out.world_normal = vertex.normal;
    out.world_pos = world_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let grass = vec3<f32>(0.36, 0.62, 0.25);
    let dirt = vec3<f32>(0.47, 0.34, 0.22);
    let base = select(dirt, grass, in.world_normal.y > 0.5);

    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.3;
    let diffuse = max(dot(in.world_normal, light_dir), 0.0);
    let lit = base * (ambient + diffuse * 0.7);

    let sky = vec3<f32>(0.1, 0.1, 0.15);
    let dist = distance(in.world_pos, uniforms.cam_pos.xyz);
    let fog = clamp((dist - 96.0) / 160.0, 0.0, 1.0);
    return vec4<f32>(mix(lit, sky, fog), 1.0);
}
"#;
