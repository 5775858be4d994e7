//! OLE Compound File Binary (CFB) reader
//! Legacy Excel workbooks (.xls) live in a `Workbook` stream of a compound file,
//! and encrypted .xlsx packages are wrapped in one as `EncryptedPackage`.

use crate::error::AdmissionCalendarError;
use crate::helpers::bytes::usize_values;
use crate::helpers::bytes::LeBytes;
use encoding_rs::UTF_16LE;
use std::collections::HashMap;
use thiserror::Error;

const MAX_REG_SECT: usize = 0xFFFF_FFFB;
const SIGNATURE: u64 = 0xE11A_B1A1_E011_CFD0;
const HEADER_SIZE: usize = 512;
const DIRECTORY_ENTRY_SIZE: usize = 128;
const MINI_STREAM_CUTOFF: usize = 4096;
const MINI_SECTOR_SIZE: usize = 64;

/// Errors specific to Compound File Binary format parsing
#[derive(Error, Debug)]
pub enum CfbError {
    #[error("The file is corrupted or has an invalid compound file structure")]
    FileFormatError,

    #[error("Invalid OLE signature (not an office document?)")]
    OleSignatureError,

    #[error("Invalid sector size '2 ^ {1}' for major version '{0}'")]
    SectorSizeError(u16, u16),

    #[error("Sector chain starting at '{0}' is broken or cyclic")]
    SectorChainError(usize),

    #[error("Empty root directory")]
    RootDirectoryError,
}

/// Parsed compound file: directory entries plus the allocation tables needed to read streams
pub(crate) struct Cfb {
    directories: HashMap<String, Directory>,
    file_allocation_table: Vec<usize>,
    sectors: Sectors,
    mini_file_allocation_table: Vec<usize>,
    mini_sectors: Sectors,
}

impl Cfb {
    /// Returns true when the bytes start with the OLE signature
    pub(crate) fn is_compound_file(bytes: &[u8]) -> bool {
        bytes.u64_at(0) == Some(SIGNATURE)
    }

    /// Parses the compound file held in `bytes`
    pub(crate) fn new(bytes: &[u8]) -> Result<Cfb, AdmissionCalendarError> {
        if bytes.len() < HEADER_SIZE {
            Err(CfbError::FileFormatError)?;
        }
        let header = Header::new(&bytes[..HEADER_SIZE])?;
        let sectors = Sectors { data: bytes.to_vec(), size: header.sector_size()? };
        let file_allocation_table = Self::load_file_allocation_table(&sectors, &header)?;
        let directories = Self::load_directories(&file_allocation_table, &sectors, header.directory_start)?;
        let mini_file_allocation_table = if header.mini_table_count > 0 {
            let bytes = Self::read_chain(&file_allocation_table, &sectors, header.mini_table_start)?;
            usize_values(&bytes).collect()
        } else {
            Vec::new()
        };
        let mini_sectors = match directories.get("Root Entry") {
            Some(root) => {
                let mut data = Self::read_chain(&file_allocation_table, &sectors, root.start)?;
                data.truncate(root.size);
                // Mini sectors have no header, so index 0 starts at byte 0
                Sectors { data: [vec![0u8; MINI_SECTOR_SIZE], data].concat(), size: MINI_SECTOR_SIZE }
            }
            None => Sectors { data: Vec::new(), size: MINI_SECTOR_SIZE },
        };

        Ok(Cfb {
            directories,
            file_allocation_table,
            sectors,
            mini_file_allocation_table,
            mini_sectors,
        })
    }

    pub(crate) fn exists(&self, name: &str) -> bool {
        self.directories.contains_key(name)
    }

    /// Reads a whole stream by name
    pub(crate) fn read(&self, name: &str) -> Result<Option<Vec<u8>>, AdmissionCalendarError> {
        let Some(directory) = self.directories.get(name) else {
            return Ok(None);
        };
        let mut bytes = if directory.size < MINI_STREAM_CUTOFF {
            Self::read_chain(&self.mini_file_allocation_table, &self.mini_sectors, directory.start)?
        } else {
            Self::read_chain(&self.file_allocation_table, &self.sectors, directory.start)?
        };
        bytes.truncate(directory.size);
        Ok(Some(bytes))
    }

    /// Collects the FAT sectors listed in the header and the DIFAT chain
    fn load_file_allocation_table(sectors: &Sectors, header: &Header) -> Result<Vec<usize>, AdmissionCalendarError> {
        let mut difat: Vec<usize> = usize_values(&sectors.data[76..HEADER_SIZE]).collect();
        let mut index = header.difat_start;
        let mut visited = 0usize;
        while index < MAX_REG_SECT {
            visited += 1;
            if visited > header.difat_count.max(1) {
                Err(CfbError::SectorChainError(header.difat_start))?;
            }
            difat.extend(usize_values(sectors.get(index)?));
            index = difat.pop().ok_or(CfbError::FileFormatError)?;
        }

        let mut file_allocation_table = Vec::new();
        for index in difat.into_iter().filter(|index| *index < MAX_REG_SECT) {
            file_allocation_table.extend(usize_values(sectors.get(index)?));
        }
        if file_allocation_table.is_empty() {
            Err(CfbError::FileFormatError)?;
        }
        Ok(file_allocation_table)
    }

    fn load_directories(file_allocation_table: &[usize], sectors: &Sectors, start: usize) -> Result<HashMap<String, Directory>, AdmissionCalendarError> {
        let bytes = Self::read_chain(file_allocation_table, sectors, start)?;
        let directories: HashMap<String, Directory> = bytes
            .chunks_exact(DIRECTORY_ENTRY_SIZE)
            .filter_map(Directory::new)
            .collect();
        if directories.is_empty() {
            Err(CfbError::RootDirectoryError)?
        }
        Ok(directories)
    }

    /// Follows an allocation chain and concatenates its sectors
    fn read_chain(table: &[usize], sectors: &Sectors, start: usize) -> Result<Vec<u8>, AdmissionCalendarError> {
        let mut content = Vec::new();
        let mut index = start;
        let mut remaining = table.len();
        while index < MAX_REG_SECT {
            if remaining == 0 {
                Err(CfbError::SectorChainError(start))?;
            }
            remaining -= 1;
            content.extend_from_slice(sectors.get(index)?);
            index = *table.get(index).ok_or(CfbError::SectorChainError(start))?;
        }
        Ok(content)
    }
}

/// Sector storage; sector `n` starts after one leading sector-sized block (the header)
struct Sectors {
    data: Vec<u8>,
    size: usize,
}

impl Sectors {
    fn get(&self, index: usize) -> Result<&[u8], CfbError> {
        let source = index
            .checked_add(1)
            .and_then(|block| block.checked_mul(self.size))
            .filter(|source| *source < self.data.len())
            .ok_or(CfbError::FileFormatError)?;
        let target = self.data.len().min(source + self.size);
        Ok(&self.data[source..target])
    }
}

struct Header {
    major_version: u16,
    sector_shift: u16,
    directory_start: usize,
    mini_table_start: usize,
    mini_table_count: usize,
    difat_start: usize,
    difat_count: usize,
}

impl Header {
    fn new(data: &[u8]) -> Result<Self, AdmissionCalendarError> {
        if data.u64_at(0) != Some(SIGNATURE) {
            Err(CfbError::OleSignatureError)?;
        }
        let field = |offset: usize| data.usize_at(offset).ok_or(CfbError::FileFormatError);
        Ok(Header {
            major_version: data.u16_at(26).ok_or(CfbError::FileFormatError)?,
            sector_shift: data.u16_at(30).ok_or(CfbError::FileFormatError)?,
            directory_start: field(48)?,
            mini_table_start: field(60)?,
            mini_table_count: field(64)?,
            difat_start: field(68)?,
            difat_count: field(72)?,
        })
    }

    fn sector_size(&self) -> Result<usize, CfbError> {
        match (self.major_version, self.sector_shift) {
            (3, 0x0009) => Ok(512),
            // Version 4 pads the 512 byte header up to a full 4096 byte sector
            (4, 0x000C) => Ok(4096),
            (major, shift) => Err(CfbError::SectorSizeError(major, shift)),
        }
    }
}

struct Directory {
    start: usize,
    size: usize,
}

impl Directory {
    fn new(bytes: &[u8]) -> Option<(String, Directory)> {
        let name_size = (bytes.u16_at(64)? as usize).min(64);
        let (name, _, _) = UTF_16LE.decode(&bytes[..name_size]);
        let name = match name.find('\0') {
            Some(position) => name[..position].to_owned(),
            None => name.into_owned(),
        };
        if name.is_empty() {
            return None;
        }
        let start = bytes.usize_at(116)?;
        let size = usize::try_from(bytes.u64_at(120)?).ok()?;
        Some((name, Directory { start, size }))
    }
}
