mod metashape;
mod stats;
