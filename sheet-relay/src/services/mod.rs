// Business logic services layer
//
// Reusable logic that sits between the HTTP surface and the Sheets client.

pub mod rows;
