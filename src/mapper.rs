//! Conversion between the persisted [`Car`] and its wire shapes.

use crate::domain::{Car, CarDto, CarPatch};

pub fn to_dto(car: &Car) -> CarDto {
    CarDto {
        id: car.id,
        name: car.name.clone(),
        colour: car.colour.clone(),
        price: car.price,
    }
}

/// Copies `id` as well; create paths reject a client-supplied id before calling this.
pub fn to_entity(dto: &CarDto) -> Car {
    Car {
        id: dto.id,
        name: dto.name.clone(),
        colour: dto.colour.clone(),
        price: dto.price,
    }
}

pub fn to_dtos(cars: &[Car]) -> Vec<CarDto> {
    cars.iter().map(to_dto).collect()
}

/// Merge the non-null fields of `patch` onto `car`. Omitted and `null` fields are left alone; the id never changes.
pub fn partial_update(car: &mut Car, patch: &CarPatch) {
    if let Some(name) = &patch.name {
        car.name = Some(name.clone());
    }
    if let Some(colour) = &patch.colour {
        car.colour = Some(colour.clone());
    }
    if let Some(price) = patch.price {
        car.price = Some(price);
    }
}

/// Overwrite every field of `car` with `dto`, nulls included; the id never changes.
pub fn replace(car: &mut Car, dto: &CarDto) {
    car.name = dto.name.clone();
    car.colour = dto.colour.clone();
    car.price = dto.price;
}
