//--------------------------------------------------------------------
// lib.rs
//--------------------------------------------------------------------
// Reads SVG path data into the commands the decomposer works on
//--------------------------------------------------------------------

extern crate derive_more;
extern crate path_triangulator;
extern crate svg;

use derive_more::*;
use path_triangulator::*;
use svg::node::element::path::*;

#[derive(Debug, Display, From)]
pub enum LoadError {
    #[display(fmt = "invalid path data: {}", _0)]
    Parse(svg::parser::Error),
    #[display(fmt = "command {} is an elliptical arc, which is not supported", _0)]
    #[from(ignore)]
    UnsupportedArc(usize)
}

impl std::error::Error for LoadError {}

fn process_relative(cmd: Vec2, relative: Position, last_value: Vec2) -> Vec2 {
    match relative {
        Position::Absolute => cmd,
        Position::Relative => last_value + cmd
    }
}

fn process_update_relative(cmd: Vec2, relative: Position, last_value: &mut Vec2) -> Vec2 {
    let pos = process_relative(cmd, relative, *last_value);
    *last_value = pos;
    pos
}

fn point(x: f32, y: f32) -> Vec2 { Vec2::new(x as Coord, y as Coord) }

pub fn path_from_string(data: &str) -> Result<Path, LoadError> {
    enum LastCmd { Quadratic, Cubic, Other }

    let data = Data::parse(data)?;

    let mut last_value = Vec2::new(0.0, 0.0);
    let mut last_control = Vec2::new(0.0, 0.0);
    let mut last_command = LastCmd::Other;
    // Where the current subpath began, to return to after a ClosePath
    let mut subpath_start = Vec2::new(0.0, 0.0);

    let mut path = Vec::new();
    for (i, command) in data.iter().enumerate() {
        match command {
            Command::Move(pos, params) => {
                let mut not_first = false;
                for cmd in params.chunks_exact(2) {
                    let pos = process_update_relative(point(cmd[0], cmd[1]), *pos, &mut last_value);
                    last_command = LastCmd::Other;
                    if not_first { path.push(PathCommand::LineTo(pos)); }
                    else {
                        path.push(PathCommand::MoveTo(pos));
                        subpath_start = pos;
                    }
                    not_first = true;
                }
            }
            Command::Line(pos, params) => {
                for cmd in params.chunks_exact(2) {
                    let pos = process_update_relative(point(cmd[0], cmd[1]), *pos, &mut last_value);
                    last_command = LastCmd::Other;
                    path.push(PathCommand::LineTo(pos));
                }
            }
            Command::HorizontalLine(pos, params) => {
                for cmd in params.iter() {
                    let v = if *pos == Position::Relative { 0.0 } else { last_value.y };
                    let pos = process_update_relative(Vec2::new(*cmd as Coord, v), *pos, &mut last_value);
                    last_command = LastCmd::Other;
                    path.push(PathCommand::LineTo(pos));
                }
            }
            Command::VerticalLine(pos, params) => {
                for cmd in params.iter() {
                    let h = if *pos == Position::Relative { 0.0 } else { last_value.x };
                    let pos = process_update_relative(Vec2::new(h, *cmd as Coord), *pos, &mut last_value);
                    last_command = LastCmd::Other;
                    path.push(PathCommand::LineTo(pos));
                }
            }
            Command::QuadraticCurve(pos, params) => {
                for cmd in params.chunks_exact(4) {
                    let ctl = process_relative(point(cmd[0], cmd[1]), *pos, last_value);
                    let pos = process_update_relative(point(cmd[2], cmd[3]), *pos, &mut last_value);
                    last_control = ctl;
                    last_command = LastCmd::Quadratic;
                    path.push(PathCommand::QuadraticBezierTo(ctl, pos));
                }
            }
            Command::CubicCurve(pos, params) => {
                for cmd in params.chunks_exact(6) {
                    let ctl1 = process_relative(point(cmd[0], cmd[1]), *pos, last_value);
                    let ctl2 = process_relative(point(cmd[2], cmd[3]), *pos, last_value);
                    let pos = process_update_relative(point(cmd[4], cmd[5]), *pos, &mut last_value);
                    last_control = ctl2;
                    last_command = LastCmd::Cubic;
                    path.push(PathCommand::CubicBezierTo(ctl1, ctl2, pos));
                }
            }
            Command::SmoothQuadraticCurve(pos, params) => {
                for cmd in params.chunks_exact(2) {
                    let lctl = if let LastCmd::Quadratic = last_command { last_control } else { last_value };
                    let ctl = last_value * 2.0 - lctl;
                    let pos = process_update_relative(point(cmd[0], cmd[1]), *pos, &mut last_value);
                    last_control = ctl;
                    last_command = LastCmd::Quadratic;
                    path.push(PathCommand::QuadraticBezierTo(ctl, pos));
                }
            }
            Command::SmoothCubicCurve(pos, params) => {
                for cmd in params.chunks_exact(4) {
                    let lctl = if let LastCmd::Cubic = last_command { last_control } else { last_value };
                    let ctl1 = last_value * 2.0 - lctl;
                    let ctl2 = process_relative(point(cmd[0], cmd[1]), *pos, last_value);
                    let pos = process_update_relative(point(cmd[2], cmd[3]), *pos, &mut last_value);
                    last_control = ctl2;
                    last_command = LastCmd::Cubic;
                    path.push(PathCommand::CubicBezierTo(ctl1, ctl2, pos));
                }
            }
            Command::EllipticalArc(..) => return Err(LoadError::UnsupportedArc(i)),
            Command::Close => {
                last_command = LastCmd::Other;
                last_value = subpath_start;
                path.push(PathCommand::ClosePath);
            }
        }
    }

    Ok(path)
}
