/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! Semantic tags from the Matter common namespaces, as used to describe locations.

use strum::FromRepr;

use crate::tlv_u8_enum;

/// The kind of area a location is (Common Area namespace).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum AreaType {
    Aisle = 0x00,
    Attic = 0x01,
    BackDoor = 0x02,
    BackYard = 0x03,
    Balcony = 0x04,
    Ballroom = 0x05,
    Bathroom = 0x06,
    Bedroom = 0x07,
    Border = 0x08,
    Boxroom = 0x09,
    BreakfastRoom = 0x0a,
    Carport = 0x0b,
    Cellar = 0x0c,
    Cloakroom = 0x0d,
    Closet = 0x0e,
    Conservatory = 0x0f,
    Corridor = 0x10,
    CraftRoom = 0x11,
    Cupboard = 0x12,
    Deck = 0x13,
    Den = 0x14,
    Dining = 0x15,
    DrawingRoom = 0x16,
    DressingRoom = 0x17,
    Driveway = 0x18,
    Elevator = 0x19,
    Ensuite = 0x1a,
    Entrance = 0x1b,
    Entryway = 0x1c,
    FamilyRoom = 0x1d,
    Foyer = 0x1e,
    FrontDoor = 0x1f,
    FrontYard = 0x20,
    GameRoom = 0x21,
    Garage = 0x22,
    GarageDoor = 0x23,
    Garden = 0x24,
    GardenDoor = 0x25,
    GuestBathroom = 0x26,
    GuestBedroom = 0x27,
    GuestRestroom = 0x28,
    GuestRoom = 0x29,
    Gym = 0x2a,
    Hallway = 0x2b,
    HearthRoom = 0x2c,
    KidsRoom = 0x2d,
    KidsBedroom = 0x2e,
    Kitchen = 0x2f,
    Larder = 0x30,
    LaundryRoom = 0x31,
    Lawn = 0x32,
    Library = 0x33,
    LivingRoom = 0x34,
    Lounge = 0x35,
    MediaTvRoom = 0x36,
    MudRoom = 0x37,
    MusicRoom = 0x38,
    Nursery = 0x39,
    Office = 0x3a,
    OutdoorKitchen = 0x3b,
    Outside = 0x3c,
    Pantry = 0x3d,
    ParkingLot = 0x3e,
    Parlor = 0x3f,
    Patio = 0x40,
    PlayRoom = 0x41,
    PoolRoom = 0x42,
    Porch = 0x43,
    PrimaryBathroom = 0x44,
    PrimaryBedroom = 0x45,
    Ramp = 0x46,
    ReceptionRoom = 0x47,
    RecreationRoom = 0x48,
    Roof = 0x49,
    Sauna = 0x4a,
    Scullery = 0x4b,
    SewingRoom = 0x4c,
    Shed = 0x4d,
    SideDoor = 0x4e,
    SideYard = 0x4f,
    SittingRoom = 0x50,
    Snug = 0x51,
    Spa = 0x52,
    Staircase = 0x53,
    SteamRoom = 0x54,
    StorageRoom = 0x55,
    Studio = 0x56,
    Study = 0x57,
    SunRoom = 0x58,
    SwimmingPool = 0x59,
    Terrace = 0x5a,
    UtilityRoom = 0x5b,
    Ward = 0x5c,
    Workshop = 0x5d,
}

/// A landmark a location is centered on or next to (Common Landmark namespace).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum LandmarkTag {
    AirConditioner = 0x00,
    AirPurifier = 0x01,
    BackDoor = 0x02,
    BarStool = 0x03,
    BathMat = 0x04,
    Bathtub = 0x05,
    Bed = 0x06,
    Bookshelf = 0x07,
    Chair = 0x08,
    ChristmasTree = 0x09,
    CoatRack = 0x0a,
    CoffeeTable = 0x0b,
    CookingRange = 0x0c,
    Couch = 0x0d,
    Countertop = 0x0e,
    Cradle = 0x0f,
    Crib = 0x10,
    Desk = 0x11,
    DiningTable = 0x12,
    Dishwasher = 0x13,
    Door = 0x14,
    Dresser = 0x15,
    LaundryDryer = 0x16,
    Fan = 0x17,
    Fireplace = 0x18,
    Freezer = 0x19,
    FrontDoor = 0x1a,
    GameTable = 0x1b,
    GarageDoor = 0x1c,
    Grill = 0x1d,
    Guitar = 0x1e,
    Heater = 0x1f,
    HomeTheater = 0x20,
    HotTub = 0x21,
    Humidifier = 0x22,
    Kennel = 0x23,
    LaundryWasher = 0x24,
    LitterBox = 0x25,
    Microwave = 0x26,
    Mirror = 0x27,
    MusicStand = 0x28,
    Nightstand = 0x29,
    Oven = 0x2a,
    PetBed = 0x2b,
    PetBowl = 0x2c,
    PetCrate = 0x2d,
    Refrigerator = 0x2e,
    ScratchingPost = 0x2f,
    ShoeRack = 0x30,
    Shower = 0x31,
    SideDoor = 0x32,
    Sink = 0x33,
    Sofa = 0x34,
    Stove = 0x35,
    Table = 0x36,
    Toilet = 0x37,
    TrashCan = 0x38,
    Window = 0x39,
    WineCooler = 0x3a,
}

/// The position of a location relative to its landmark (Common Position namespace).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum PositionTag {
    Left = 0x00,
    Right = 0x01,
    Top = 0x02,
    Bottom = 0x03,
    Middle = 0x04,
    Row = 0x05,
    Column = 0x06,
    Under = 0x07,
    NextTo = 0x08,
    Around = 0x09,
    On = 0x0a,
    Above = 0x0b,
    FrontOf = 0x0c,
    Behind = 0x0d,
}

/// The floor surface of a location (Common Floor Surface namespace).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum FloorSurfaceTag {
    Carpet = 0x00,
    Ceramic = 0x01,
    Concrete = 0x02,
    Cork = 0x03,
    DeepCarpet = 0x04,
    Dirt = 0x05,
    EngineeredWood = 0x06,
    Glass = 0x07,
    Grass = 0x08,
    Hardwood = 0x09,
    Laminate = 0x0a,
    Linoleum = 0x0b,
    Mat = 0x0c,
    Metal = 0x0d,
    Plastic = 0x0e,
    PolishedConcrete = 0x0f,
    Rubber = 0x10,
    Rug = 0x11,
    Sand = 0x12,
    Stone = 0x13,
    Tatami = 0x14,
    Terrazzo = 0x15,
    Tile = 0x16,
    Vinyl = 0x17,
}

tlv_u8_enum!(AreaType LandmarkTag PositionTag FloorSurfaceTag);
