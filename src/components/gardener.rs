//! Components of the gardener robot. All of them act on the shared
//! [`Garden`](super::Garden) and require one to be configured.

use super::garden::{Garden, EMPTY, MINT, ROSE, VASILEK};
use super::{parse_int, single_arg, ComponentError, Effects, Orientation, Value};
use serde::Serialize;

lookup_table! {
    pub enum SensorMethod {
        SearchWalls => "search_walls",
        SearchFlowers => "search_flowers",
    }
}

impl SensorMethod {
    pub fn arity(self) -> usize {
        0
    }
}

lookup_table! {
    pub enum SensorAttribute {
        Flower => "flower",
        WallLeft => "wall_left",
        WallRight => "wall_right",
        WallStraight => "wall_straight",
        WallBack => "wall_back",
        Empty => "empty",
        Rose => "rose",
        Mint => "mint",
        Vasilek => "vasilek",
        North => "north",
    }
}

/// Reads walls around the robot and the flower under it.
///
/// Readings are cached on the sensor and only refreshed by
/// `search_walls` / `search_flowers`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Sensor {
    flower: i64,
    wall_left: i64,
    wall_right: i64,
    wall_straight: i64,
    wall_back: i64,
}

impl Sensor {
    pub fn new(garden: &Garden) -> Self {
        Self {
            flower: garden.current_flower(),
            ..Self::default()
        }
    }

    pub fn call(&mut self, method: SensorMethod, fx: &mut Effects<'_>) -> Result<(), ComponentError> {
        match method {
            SensorMethod::SearchWalls => {
                let garden = fx.garden()?;
                garden.update_walls();
                self.wall_left = garden.wall_left();
                self.wall_right = garden.wall_right();
                self.wall_straight = garden.wall_straight();
                self.wall_back = garden.wall_back();

                // only the first wall found, checked in this order
                let found = [
                    (self.wall_right, "wall_right"),
                    (self.wall_back, "wall_back"),
                    (self.wall_left, "wall_left"),
                    (self.wall_straight, "wall_straight"),
                ]
                .into_iter()
                .find(|(wall, _)| *wall != 0);
                if let Some((_, event)) = found {
                    fx.emit(event);
                }
            }
            SensorMethod::SearchFlowers => {
                self.flower = fx.garden()?.current_flower();
                fx.emit("isDataRecieved");
            }
        }
        Ok(())
    }

    pub fn get(&self, attribute: SensorAttribute) -> Value {
        let value = match attribute {
            SensorAttribute::Flower => self.flower,
            SensorAttribute::WallLeft => self.wall_left,
            SensorAttribute::WallRight => self.wall_right,
            SensorAttribute::WallStraight => self.wall_straight,
            SensorAttribute::WallBack => self.wall_back,
            SensorAttribute::Empty => EMPTY,
            SensorAttribute::Rose => ROSE,
            SensorAttribute::Mint => MINT,
            SensorAttribute::Vasilek => VASILEK,
            SensorAttribute::North => Orientation::North.code(),
        };
        Value::Int(value)
    }
}

lookup_table! {
    pub enum FlowerMethod {
        Plant => "plant",
    }
}

impl FlowerMethod {
    pub fn arity(self) -> usize {
        1
    }
}

/// Plants a flower kind in the robot's current cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Flower {
    planted: usize,
}

impl Flower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(
        &mut self,
        method: FlowerMethod,
        args: &[String],
        fx: &mut Effects<'_>,
    ) -> Result<(), ComponentError> {
        match method {
            FlowerMethod::Plant => {
                let kind = parse_int(method.as_str(), single_arg("Flower", method.as_str(), args)?)?;
                fx.garden()?.plant(kind)?;
                self.planted += 1;
            }
        }
        Ok(())
    }

    pub fn planted(&self) -> usize {
        self.planted
    }
}

lookup_table! {
    pub enum MoverMethod {
        MoveForward => "move_forward",
        MoveBackward => "move_backward",
        TurnLeft => "turn_left",
        TurnRight => "turn_right",
    }
}

impl MoverMethod {
    pub fn arity(self) -> usize {
        0
    }
}

/// Moves and turns the robot. Driving into a wall or off the field is a
/// crash.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Mover {
    moves: usize,
}

impl Mover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(&mut self, method: MoverMethod, fx: &mut Effects<'_>) -> Result<(), ComponentError> {
        let garden = fx.garden()?;
        match method {
            MoverMethod::MoveForward => garden.move_forward()?,
            MoverMethod::MoveBackward => garden.move_backward()?,
            MoverMethod::TurnLeft => garden.turn_left(),
            MoverMethod::TurnRight => garden.turn_right(),
        }
        self.moves += 1;
        Ok(())
    }

    pub fn moves(&self) -> usize {
        self.moves
    }
}

lookup_table! {
    pub enum CompassAttribute {
        X => "x",
        Y => "y",
        Orientation => "orientation",
        North => "north",
        South => "south",
        West => "west",
        East => "east",
    }
}

/// Read-only view of the robot's position and heading.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Compass;

impl Compass {
    pub fn new() -> Self {
        Self
    }

    pub fn get(&self, attribute: CompassAttribute, garden: &Garden) -> Value {
        let value = match attribute {
            CompassAttribute::X => garden.x() as i64,
            CompassAttribute::Y => garden.y() as i64,
            CompassAttribute::Orientation => garden.orientation().code(),
            CompassAttribute::North => Orientation::North.code(),
            CompassAttribute::South => Orientation::South.code(),
            CompassAttribute::West => Orientation::West.code(),
            CompassAttribute::East => Orientation::East.code(),
        };
        Value::Int(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GardenConfig;
    use crate::core::EventQueue;

    #[test]
    fn search_walls_reports_first_wall_found() {
        let mut garden = Garden::new(&GardenConfig::new(3, 3)).unwrap();
        let mut queue = EventQueue::new();
        let mut sensor = Sensor::new(&garden);

        let mut fx = Effects::new("sensor", &mut queue, Some(&mut garden));
        sensor.call(SensorMethod::SearchWalls, &mut fx).unwrap();

        // at (0, 0) facing south both right (west) and back (north) are walls
        assert_eq!(queue.pending(), ["sensor.wall_right"]);
        assert_eq!(sensor.get(SensorAttribute::WallBack), Value::Int(1));
        assert_eq!(sensor.get(SensorAttribute::WallStraight), Value::Int(0));
    }

    #[test]
    fn search_flowers_caches_current_cell() {
        let mut garden = Garden::new(&GardenConfig::new(2, 2).flower(0, 0, MINT)).unwrap();
        let mut queue = EventQueue::new();
        let mut sensor = Sensor::default();
        assert_eq!(sensor.get(SensorAttribute::Flower), Value::Int(EMPTY));

        let mut fx = Effects::new("sensor", &mut queue, Some(&mut garden));
        sensor.call(SensorMethod::SearchFlowers, &mut fx).unwrap();

        assert_eq!(sensor.get(SensorAttribute::Flower), Value::Int(MINT));
        assert_eq!(sensor.get(SensorAttribute::Mint), Value::Int(MINT));
        assert_eq!(queue.pending(), ["sensor.isDataRecieved"]);
    }

    #[test]
    fn mover_and_flower_change_the_garden() {
        let mut garden = Garden::new(&GardenConfig::new(3, 3)).unwrap();
        let mut queue = EventQueue::new();
        let mut mover = Mover::new();
        let mut flower = Flower::new();
        {
            let mut fx = Effects::new("mover", &mut queue, Some(&mut garden));
            mover.call(MoverMethod::MoveForward, &mut fx).unwrap();
            mover.call(MoverMethod::TurnLeft, &mut fx).unwrap();
            flower
                .call(FlowerMethod::Plant, &["3".to_string()], &mut fx)
                .unwrap();
        }

        assert_eq!(mover.moves(), 2);
        assert_eq!(flower.planted(), 1);
        assert_eq!(garden.cell(0, 1), Some(VASILEK));
        assert_eq!(
            Compass::new().get(CompassAttribute::Orientation, &garden),
            Value::Int(Orientation::East.code())
        );
        assert_eq!(Compass::new().get(CompassAttribute::Y, &garden), Value::Int(1));
    }

    #[test]
    fn flower_rejects_wall_kind() {
        let mut garden = Garden::new(&GardenConfig::new(2, 2)).unwrap();
        let mut queue = EventQueue::new();
        let mut flower = Flower::new();
        let mut fx = Effects::new("flower", &mut queue, Some(&mut garden));

        let err = flower
            .call(FlowerMethod::Plant, &["-1".to_string()], &mut fx)
            .unwrap_err();
        assert!(matches!(err, ComponentError::BadArgument { .. }));
        let err = flower.call(FlowerMethod::Plant, &[], &mut fx).unwrap_err();
        assert!(matches!(err, ComponentError::Arity { .. }));
        assert_eq!(flower.planted(), 0);
        assert_eq!(garden.cell(0, 0), Some(EMPTY));
    }

    #[test]
    fn mover_crash_propagates() {
        let mut garden = Garden::new(&GardenConfig::new(2, 2)).unwrap();
        let mut queue = EventQueue::new();
        let mut fx = Effects::new("mover", &mut queue, Some(&mut garden));

        let err = Mover::new()
            .call(MoverMethod::MoveBackward, &mut fx)
            .unwrap_err();
        assert_eq!(err, ComponentError::Crash("out of bounds!"));
    }

    #[test]
    fn garden_components_need_a_garden() {
        let mut queue = EventQueue::new();
        let mut fx = Effects::new("mover", &mut queue, None);
        let err = Mover::new().call(MoverMethod::TurnLeft, &mut fx).unwrap_err();
        assert_eq!(err, ComponentError::MissingOption("gardener"));
    }
}
