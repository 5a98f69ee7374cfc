mod basic;
mod helper;
mod negotiation;
