use std::path::{Path, PathBuf};

use insta::assert_snapshot;

use crate::metashape::{Step, parse_measure, py_str, render_pipeline, render_query};

#[test]
fn paths_render_as_quoted_python_strings() {
    assert_eq!(py_str(Path::new("/photos/a.jpg")), r#""/photos/a.jpg""#);
    assert_eq!(
        py_str(Path::new(r#"odd "name".jpg"#)),
        r#""odd \"name\".jpg""#
    );
}

#[test]
fn pipeline_script_saves_before_and_after_the_steps() {
    let steps = [
        Step::AddPhotos(vec![PathBuf::from("/p/a.jpg"), PathBuf::from("/p/b.jpeg")]),
        Step::MatchPhotos(0),
        Step::AlignCameras,
        Step::OptimizeCameras,
        Step::BuildDepthMaps(1),
        Step::BuildModel,
        Step::BuildUv(16384),
        Step::BuildTexture(16384),
    ];
    let script = render_pipeline(Path::new("/proj/reef/reconstruction.psx"), &steps);
    assert_snapshot!(script, @r#"
    import Metashape
    doc = Metashape.Document()
    doc.save("/proj/reef/reconstruction.psx")
    chunk = doc.addChunk()
    chunk.addPhotos(["/p/a.jpg", "/p/b.jpeg"])
    chunk.matchPhotos(downscale=0)
    chunk.alignCameras()
    chunk.optimizeCameras()
    chunk.buildDepthMaps(downscale=1)
    chunk.buildModel(source_data=Metashape.DepthMapsData)
    chunk.buildUV(texture_size=16384)
    chunk.buildTexture(texture_size=16384)
    doc.save()
    "#);
}

#[test]
fn area_query_does_not_close_holes() {
    let script = render_query(
        Path::new("/proj/reconstruction.psx"),
        None,
        "surface_area",
        "area()",
    );
    assert!(!script.contains("closeHoles"));
    assert!(script.contains(r#"print("surface_area=%r" % model.area())"#));
}

#[test]
fn volume_query_replays_the_recorded_hole_level() {
    let script = render_query(
        Path::new("/proj/reconstruction.psx"),
        Some(100),
        "volume",
        "volume()",
    );
    assert_snapshot!(script, @r#"
    import Metashape
    doc = Metashape.Document()
    doc.open("/proj/reconstruction.psx")
    model = doc.chunks[0].model
    model.closeHoles(level=100)
    print("volume=%r" % model.volume())
    "#);
}

#[test]
fn measurements_parse_from_noisy_runner_output() {
    let stdout = "LoadProject: path = x\nvolume=0.0481292\nFinished\n";
    assert_eq!(parse_measure("volume", stdout).unwrap(), 0.048_129_2);

    assert!(parse_measure("volume", "no measurements here\n").is_err());
    assert!(parse_measure("volume", "volume=not a number\n").is_err());
}
