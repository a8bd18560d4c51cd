use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_SET_OPTION` values.
#[derive(Debug, Copy, Clone)]
#[repr(u16)]
pub enum SetOption {
    MultiStatementsOn = 0x00,
    MultiStatementsOff = 0x01,
}

#[derive(Debug)]
pub struct ComSetOption {
    pub option: SetOption,
}

impl Encode for ComSetOption {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_SET_OPTION);
        buf.put_u16::<LittleEndian>(self.option as u16);
    }
}
